use std::collections::HashMap;

use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::quizzes::{AnswerInput, CreateQuizRequest, QuestionInput, UpdateQuestionRequest},
    entity::{
        certificates,
        quizzes::{ActiveModel, Model as QuizModel, Question, QuestionList},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_student},
    repository::{Page, now, paginate_slice},
    routes::params::ListParams,
    services::{
        certificate_service,
        course_service::{available_course, owned_course},
    },
    state::AppState,
};

/// Score of one submission.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub total: usize,
    pub correct: usize,
    pub percentage: u32,
    pub passed: bool,
    pub certificate: Option<certificates::Model>,
}

/// Key under which question texts must be unique within a quiz.
pub fn question_key(text: &str) -> String {
    text.trim().to_lowercase()
}

fn build_question(id: Uuid, input: QuestionInput) -> AppResult<Question> {
    let question_text = input.question_text.trim().to_string();
    if question_text.is_empty() {
        return Err(AppError::BadRequest("Question text is required".into()));
    }

    let options: Vec<String> = input
        .options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if options.len() < 2 {
        return Err(AppError::BadRequest("A question needs at least two options".into()));
    }
    let mut seen: Vec<String> = options.iter().map(|o| o.to_lowercase()).collect();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != options.len() {
        return Err(AppError::BadRequest("Options must be distinct".into()));
    }

    let correct_answer = input.correct_answer.trim().to_string();
    if !options.contains(&correct_answer) {
        return Err(AppError::BadRequest("Correct answer must be one of the options".into()));
    }

    Ok(Question {
        id,
        question_text,
        options,
        correct_answer,
    })
}

fn ensure_unique_text(questions: &[Question], text: &str, exclude: Option<Uuid>) -> AppResult<()> {
    let key = question_key(text);
    let duplicate = questions
        .iter()
        .any(|q| Some(q.id) != exclude && question_key(&q.question_text) == key);
    if duplicate {
        return Err(AppError::Conflict("This question already exists in the quiz".into()));
    }
    Ok(())
}

/// Count correct answers. Answers to unknown questions are ignored and the
/// last answer given for a question wins.
pub fn grade(questions: &[Question], answers: &[AnswerInput]) -> (usize, usize) {
    let given: HashMap<Uuid, &str> = answers
        .iter()
        .map(|a| (a.question_id, a.answer.trim()))
        .collect();
    let correct = questions
        .iter()
        .filter(|q| given.get(&q.id).is_some_and(|a| *a == q.correct_answer))
        .count();
    (correct, questions.len())
}

async fn owned_quiz(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<QuizModel> {
    owned_course(state, user, course_id).await?;
    state
        .quizzes()
        .find_by_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz"))
}

async fn save(state: &AppState, quiz: &QuizModel, questions: Vec<Question>) -> AppResult<QuizModel> {
    state
        .quizzes()
        .save_questions(quiz, questions)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("The quiz was modified by another request; reload and retry".into())
        })
}

pub async fn create_quiz(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    payload: CreateQuizRequest,
) -> AppResult<QuizModel> {
    owned_course(state, user, course_id).await?;
    let repo = state.quizzes();
    if repo.find_by_course(course_id).await?.is_some() {
        return Err(AppError::Conflict("This course already has a quiz".into()));
    }

    let mut questions: Vec<Question> = Vec::with_capacity(payload.questions.len());
    for input in payload.questions {
        let question = build_question(Uuid::new_v4(), input)?;
        ensure_unique_text(&questions, &question.question_text, None)?;
        questions.push(question);
    }

    let created_at = now();
    let quiz = repo
        .create(ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            instructor_id: Set(user.user_id),
            questions: Set(QuestionList(questions)),
            version: Set(1),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        })
        .await?;

    audit::record(
        state,
        user.user_id,
        "quiz_create",
        "quizzes",
        serde_json::json!({ "quiz_id": quiz.id, "course_id": course_id }),
    )
    .await;
    Ok(quiz)
}

pub async fn get_quiz(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<QuizModel> {
    owned_quiz(state, user, course_id).await
}

pub async fn delete_quiz(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<QuizModel> {
    let quiz = owned_quiz(state, user, course_id).await?;
    state
        .quizzes()
        .delete(quiz.id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz"))
}

pub async fn list_questions(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    params: &ListParams,
) -> AppResult<Page<Question>> {
    let quiz = owned_quiz(state, user, course_id).await?;
    let term = params.search.to_lowercase();
    let matching: Vec<Question> = quiz
        .questions
        .0
        .into_iter()
        .filter(|q| term.is_empty() || q.question_text.to_lowercase().contains(&term))
        .collect();
    Ok(paginate_slice(&matching, params.page, params.limit))
}

pub async fn add_question(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    input: QuestionInput,
) -> AppResult<Question> {
    let quiz = owned_quiz(state, user, course_id).await?;
    let question = build_question(Uuid::new_v4(), input)?;
    ensure_unique_text(&quiz.questions.0, &question.question_text, None)?;

    let mut questions = quiz.questions.0.clone();
    questions.push(question.clone());
    save(state, &quiz, questions).await?;
    Ok(question)
}

pub async fn update_question(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    question_id: Uuid,
    payload: UpdateQuestionRequest,
) -> AppResult<Question> {
    let quiz = owned_quiz(state, user, course_id).await?;
    let mut questions = quiz.questions.0.clone();
    let position = questions
        .iter()
        .position(|q| q.id == question_id)
        .ok_or_else(|| AppError::not_found("Question"))?;

    let current = &questions[position];
    let merged = build_question(
        question_id,
        QuestionInput {
            question_text: payload
                .question_text
                .unwrap_or_else(|| current.question_text.clone()),
            options: payload.options.unwrap_or_else(|| current.options.clone()),
            correct_answer: payload
                .correct_answer
                .unwrap_or_else(|| current.correct_answer.clone()),
        },
    )?;
    ensure_unique_text(&questions, &merged.question_text, Some(question_id))?;

    questions[position] = merged.clone();
    save(state, &quiz, questions).await?;
    Ok(merged)
}

pub async fn remove_question(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    question_id: Uuid,
) -> AppResult<Question> {
    let quiz = owned_quiz(state, user, course_id).await?;
    let mut questions = quiz.questions.0.clone();
    let position = questions
        .iter()
        .position(|q| q.id == question_id)
        .ok_or_else(|| AppError::not_found("Question"))?;

    let removed = questions.remove(position);
    save(state, &quiz, questions).await?;
    Ok(removed)
}

/// The quiz of a published course, for a student to take.
pub async fn student_quiz(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<QuizModel> {
    ensure_student(user)?;
    available_course(state, course_id).await?;
    state
        .quizzes()
        .find_by_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz"))
}

pub async fn submit_quiz(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    answers: &[AnswerInput],
) -> AppResult<QuizOutcome> {
    ensure_student(user)?;
    let course = available_course(state, course_id).await?;
    let quiz = state
        .quizzes()
        .find_by_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz"))?;
    if quiz.questions.0.is_empty() {
        return Err(AppError::BadRequest("This quiz has no questions yet".into()));
    }

    let (correct, total) = grade(&quiz.questions.0, answers);
    let percentage = u32::try_from(correct * 100 / total).unwrap_or(100);
    let passed = percentage >= state.config.quiz_pass_percent;
    tracing::debug!(%course_id, student_id = %user.user_id, correct, total, passed, "quiz graded");

    let certificate = if passed {
        Some(certificate_service::issue_certificate(state, user, &course).await?)
    } else {
        None
    };

    Ok(QuizOutcome {
        total,
        correct,
        percentage,
        passed,
        certificate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str, answer: &str) -> QuestionInput {
        QuestionInput {
            question_text: text.into(),
            options: vec!["4".into(), "5".into()],
            correct_answer: answer.into(),
        }
    }

    #[test]
    fn question_needs_answer_among_options() {
        assert!(build_question(Uuid::new_v4(), input("2 + 2?", "4")).is_ok());
        assert!(matches!(
            build_question(Uuid::new_v4(), input("2 + 2?", "22")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn question_needs_two_distinct_options() {
        let mut single = input("2 + 2?", "4");
        single.options = vec!["4".into(), "  ".into()];
        assert!(build_question(Uuid::new_v4(), single).is_err());

        let mut repeated = input("2 + 2?", "4");
        repeated.options = vec!["Four".into(), "four".into()];
        repeated.correct_answer = "Four".into();
        assert!(build_question(Uuid::new_v4(), repeated).is_err());
    }

    #[test]
    fn duplicate_text_ignores_case_and_padding() {
        let existing = build_question(Uuid::new_v4(), input("What is 2 + 2?", "4")).unwrap();
        let questions = vec![existing.clone()];
        assert!(matches!(
            ensure_unique_text(&questions, "  what is 2 + 2?  ", None),
            Err(AppError::Conflict(_))
        ));
        assert!(ensure_unique_text(&questions, "what is 2 + 2?", Some(existing.id)).is_ok());
    }

    #[test]
    fn grading_counts_matching_answers() {
        let first = build_question(Uuid::new_v4(), input("a?", "4")).unwrap();
        let second = build_question(Uuid::new_v4(), input("b?", "5")).unwrap();
        let answers = vec![
            AnswerInput { question_id: first.id, answer: " 4 ".into() },
            AnswerInput { question_id: second.id, answer: "4".into() },
            AnswerInput { question_id: Uuid::new_v4(), answer: "5".into() },
        ];
        assert_eq!(grade(&[first, second], &answers), (1, 2));
    }
}
