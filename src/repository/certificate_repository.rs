use sea_orm::{ColumnTrait, Condition, Order};
use uuid::Uuid;

use crate::{
    entity::{
        Certificates, Courses,
        certificates::{Column, Model},
        courses,
    },
    error::AppResult,
};

use super::{Page, Repository};

pub type CertificateRepository<'db> = Repository<'db, Certificates>;

impl CertificateRepository<'_> {
    pub async fn find_for(&self, student_id: Uuid, course_id: Uuid) -> AppResult<Option<Model>> {
        self.find_one(
            Condition::all()
                .add(Column::StudentId.eq(student_id))
                .add(Column::CourseId.eq(course_id)),
        )
        .await
    }

    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<(Model, Option<courses::Model>)>> {
        self.paginate_with::<Courses>(
            Condition::all().add(Column::StudentId.eq(student_id)),
            page,
            limit,
            Some((Column::IssuedAt, Order::Desc)),
        )
        .await
    }
}
