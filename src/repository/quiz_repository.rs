use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, sea_query::Expr};
use uuid::Uuid;

use crate::{
    entity::{
        Quizzes,
        quizzes::{Column, Model, Question, QuestionList},
    },
    error::AppResult,
};

use super::Repository;

pub type QuizRepository<'db> = Repository<'db, Quizzes>;

impl QuizRepository<'_> {
    pub async fn find_by_course(&self, course_id: Uuid) -> AppResult<Option<Model>> {
        self.find_one(Condition::all().add(Column::CourseId.eq(course_id)))
            .await
    }

    /// Replace the embedded questions of `current`, guarded by its version.
    ///
    /// Returns `None` when the quiz changed (or vanished) since `current` was
    /// read, leaving the stored questions untouched.
    pub async fn save_questions(&self, current: &Model, questions: Vec<Question>) -> AppResult<Option<Model>> {
        let result = Quizzes::update_many()
            .col_expr(Column::Questions, Expr::value(QuestionList(questions)))
            .col_expr(Column::Version, Expr::value(current.version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(Column::Id.eq(current.id))
            .filter(Column::Version.eq(current.version))
            .exec(self.conn())
            .await?;

        if result.rows_affected == 0 {
            tracing::debug!(quiz_id = %current.id, version = current.version, "stale quiz write rejected");
            return Ok(None);
        }
        self.find_by_id(current.id).await
    }
}
