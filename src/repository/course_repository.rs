use sea_orm::{ColumnTrait, Condition, Order};
use uuid::Uuid;

use crate::{
    entity::{
        Categories, Courses, categories,
        courses::{Column, Model},
    },
    error::AppResult,
};

use super::{Page, Repository, search_condition};

pub type CourseRepository<'db> = Repository<'db, Courses>;

pub type CourseWithCategory = (Model, Option<categories::Model>);

impl CourseRepository<'_> {
    pub async fn find_owned(&self, course_id: Uuid, instructor_id: Uuid) -> AppResult<Option<Model>> {
        self.find_one(
            Condition::all()
                .add(Column::Id.eq(course_id))
                .add(Column::InstructorId.eq(instructor_id)),
        )
        .await
    }

    pub async fn find_published(&self, course_id: Uuid) -> AppResult<Option<Model>> {
        self.find_one(
            Condition::all()
                .add(Column::Id.eq(course_id))
                .add(Column::IsPublished.eq(true)),
        )
        .await
    }

    pub async fn list_by_instructor(
        &self,
        instructor_id: Uuid,
        search: &str,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<CourseWithCategory>> {
        let filter = Condition::all()
            .add(Column::InstructorId.eq(instructor_id))
            .add(search_condition(search, Column::Title, None));
        self.paginate_with::<Categories>(filter, page, limit, Some((Column::CreatedAt, Order::Desc)))
            .await
    }

    /// Published courses whose category is listed.
    pub async fn list_published(
        &self,
        search: &str,
        category_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<CourseWithCategory>> {
        let mut filter = Condition::all()
            .add(Column::IsPublished.eq(true))
            .add(categories::Column::IsListed.eq(true))
            .add(search_condition(search, Column::Title, None));
        if let Some(category_id) = category_id {
            filter = filter.add(Column::CategoryId.eq(category_id));
        }
        self.paginate_with::<Categories>(filter, page, limit, Some((Column::CreatedAt, Order::Desc)))
            .await
    }
}
