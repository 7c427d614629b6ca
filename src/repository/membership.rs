//! Per-student sets of course references (cart, wishlist).

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel,
    Order, PrimaryKeyTrait, QueryFilter, Related,
};
use uuid::Uuid;

use crate::{
    entity::{Courses, courses},
    error::AppResult,
};

use super::{Page, Repository};

/// A table of `(student_id, course_id)` rows forming one set per student.
pub trait CourseSetEntity: EntityTrait + Related<Courses> {
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    fn student_column() -> Self::Column;
    fn course_column() -> Self::Column;
    fn added_at_column() -> Self::Column;
    fn new_member(student_id: Uuid, course_id: Uuid) -> Self::Active;
}

impl<E> Repository<'_, E>
where
    E: CourseSetEntity,
    E::Model: IntoActiveModel<E::Active> + Send + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    fn membership(student_id: Uuid, course_id: Uuid) -> Condition {
        Condition::all()
            .add(E::student_column().eq(student_id))
            .add(E::course_column().eq(course_id))
    }

    pub async fn contains_course(&self, student_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        self.exists(Self::membership(student_id, course_id)).await
    }

    pub async fn add_course(&self, student_id: Uuid, course_id: Uuid) -> AppResult<E::Model> {
        self.create(E::new_member(student_id, course_id)).await
    }

    /// Returns the number of rows removed; zero when the course was absent.
    pub async fn remove_course(&self, student_id: Uuid, course_id: Uuid) -> AppResult<u64> {
        self.delete_many(Self::membership(student_id, course_id)).await
    }

    pub async fn clear_courses(&self, student_id: Uuid) -> AppResult<u64> {
        self.delete_many(Condition::all().add(E::student_column().eq(student_id)))
            .await
    }

    pub async fn page_courses(
        &self,
        student_id: Uuid,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<courses::Model>> {
        let page = self
            .paginate_with::<Courses>(
                Condition::all().add(E::student_column().eq(student_id)),
                page,
                limit,
                Some((E::added_at_column(), Order::Desc)),
            )
            .await?;
        Ok(Page {
            data: page.data.into_iter().filter_map(|(_, course)| course).collect(),
            total: page.total,
        })
    }

    pub async fn all_courses(&self, student_id: Uuid) -> AppResult<Vec<courses::Model>> {
        let rows = E::find()
            .filter(E::student_column().eq(student_id))
            .find_also_related(Courses)
            .all(self.conn())
            .await?;
        Ok(rows.into_iter().filter_map(|(_, course)| course).collect())
    }
}
