use sea_orm::{
    ColumnTrait, Condition, FromQueryResult, Order,
    sea_query::{Alias, Expr, Query},
};
use uuid::Uuid;

use crate::{
    entity::{
        Categories, Courses,
        categories::{Column, Model},
        courses,
    },
    error::AppResult,
};

use super::{Page, Repository, search_condition};

pub type CategoryRepository<'db> = Repository<'db, Categories>;

/// Uniqueness key for category names.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CategoryCourseCount {
    pub category_id: Uuid,
    pub category_name: String,
    pub course_count: i64,
}

impl CategoryRepository<'_> {
    pub async fn find_category_by_name(&self, name: &str) -> AppResult<Option<Model>> {
        self.find_one(Condition::all().add(Column::NameKey.eq(name_key(name))))
            .await
    }

    /// A category other than `exclude` whose name collides with `name`.
    pub async fn find_name_conflict(&self, name: &str, exclude: Option<Uuid>) -> AppResult<Option<Model>> {
        let mut filter = Condition::all().add(Column::NameKey.eq(name_key(name)));
        if let Some(id) = exclude {
            filter = filter.add(Column::Id.ne(id));
        }
        self.find_one(filter).await
    }

    pub async fn search(
        &self,
        search: &str,
        listed_only: bool,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<Model>> {
        let mut filter = Condition::all().add(search_condition(search, Column::CategoryName, None));
        if listed_only {
            filter = filter.add(Column::IsListed.eq(true));
        }
        self.paginate(filter, page, limit, Some((Column::CreatedAt, Order::Desc)))
            .await
    }

    pub async fn course_counts(&self) -> AppResult<Vec<CategoryCourseCount>> {
        let query = Query::select()
            .expr_as(Expr::col((Categories, Column::Id)), Alias::new("category_id"))
            .expr_as(
                Expr::col((Categories, Column::CategoryName)),
                Alias::new("category_name"),
            )
            .expr_as(
                Expr::col((Courses, courses::Column::Id)).count(),
                Alias::new("course_count"),
            )
            .from(Categories)
            .left_join(
                Courses,
                Expr::col((Courses, courses::Column::CategoryId))
                    .equals((Categories, Column::Id)),
            )
            .group_by_col((Categories, Column::Id))
            .group_by_col((Categories, Column::CategoryName))
            .order_by((Categories, Column::CategoryName), Order::Asc)
            .to_owned();

        self.aggregate(&query).await
    }
}
