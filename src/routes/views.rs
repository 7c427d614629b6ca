//! Conversions from stored records to response models. Storage keys never
//! leave the server; each one is swapped for a presigned URL here.

use crate::{
    entity::{certificates, chapters, courses, quizzes},
    error::AppResult,
    models::{Certificate, Chapter, Course, DemoVideo, Quiz, StudentQuiz},
    services::course_service::CourseRecord,
    state::AppState,
};

pub async fn course(state: &AppState, record: CourseRecord) -> AppResult<Course> {
    let CourseRecord {
        course,
        category_name,
        instructor_name,
    } = record;

    let thumbnail_url = state.presign(course.thumbnail_key.as_deref()).await?;
    let demo_video = match course.demo_video {
        Some(video) => Some(DemoVideo {
            url: state.storage.presign(&video.key, state.config.presign_ttl).await?,
            content_type: video.content_type,
            size_bytes: video.size_bytes,
        }),
        None => None,
    };

    Ok(Course {
        id: course.id,
        instructor_id: course.instructor_id,
        instructor_name,
        category_id: course.category_id,
        category_name,
        title: course.title,
        description: course.description,
        price: course.price,
        level: course.level,
        thumbnail_url,
        demo_video,
        is_published: course.is_published,
        created_at: course.created_at,
        updated_at: course.updated_at,
    })
}

pub async fn bare_course(state: &AppState, model: courses::Model) -> AppResult<Course> {
    course(
        state,
        CourseRecord {
            course: model,
            category_name: None,
            instructor_name: None,
        },
    )
    .await
}

pub async fn courses(state: &AppState, records: Vec<CourseRecord>) -> AppResult<Vec<Course>> {
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        items.push(course(state, record).await?);
    }
    Ok(items)
}

pub async fn bare_courses(state: &AppState, models: Vec<courses::Model>) -> AppResult<Vec<Course>> {
    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(bare_course(state, model).await?);
    }
    Ok(items)
}

pub async fn chapter(state: &AppState, model: chapters::Model) -> AppResult<Chapter> {
    let video_url = state.presign(model.video_key.as_deref()).await?;
    Ok(Chapter::from_entity(model, video_url))
}

pub async fn chapters(state: &AppState, models: Vec<chapters::Model>) -> AppResult<Vec<Chapter>> {
    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(chapter(state, model).await?);
    }
    Ok(items)
}

pub async fn certificate(
    state: &AppState,
    model: certificates::Model,
    course_title: Option<String>,
) -> AppResult<Certificate> {
    let download_url = state
        .storage
        .presign(&model.storage_key, state.config.presign_ttl)
        .await?;
    Ok(Certificate {
        id: model.id,
        course_id: model.course_id,
        course_title,
        download_url,
        issued_at: model.issued_at,
    })
}

pub fn quiz(model: quizzes::Model) -> Quiz {
    Quiz {
        id: model.id,
        course_id: model.course_id,
        questions: model.questions.0,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn student_quiz(model: quizzes::Model) -> StudentQuiz {
    StudentQuiz {
        id: model.id,
        course_id: model.course_id,
        questions: model.questions.0.into_iter().map(Into::into).collect(),
    }
}
