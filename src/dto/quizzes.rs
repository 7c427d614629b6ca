use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity::quizzes::Question, models::Certificate};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionInput {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuizRequest {
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct QuestionPage {
    #[schema(value_type = Vec<Question>)]
    pub items: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnswerInput {
    pub question_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitQuizRequest {
    pub answers: Vec<AnswerInput>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CertificateList {
    #[schema(value_type = Vec<Certificate>)]
    pub items: Vec<Certificate>,
}
