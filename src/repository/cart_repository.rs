use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::entity::{
    CartItems,
    cart_items::{ActiveModel, Column},
};

use super::{Repository, membership::CourseSetEntity, now};

pub type CartRepository<'db> = Repository<'db, CartItems>;

impl CourseSetEntity for CartItems {
    type Active = ActiveModel;

    fn student_column() -> Column {
        Column::StudentId
    }

    fn course_column() -> Column {
        Column::CourseId
    }

    fn added_at_column() -> Column {
        Column::CreatedAt
    }

    fn new_member(student_id: Uuid, course_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            course_id: Set(course_id),
            created_at: Set(now()),
        }
    }
}
