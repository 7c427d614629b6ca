use bytes::Bytes;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit,
    certificate::{CertificateDetails, render_certificate},
    entity::{
        certificates::{ActiveModel, Model as CertificateModel},
        courses,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_student},
    repository::{Page, now},
    routes::params::ListParams,
    state::AppState,
};

/// Render, store and record the certificate for `student` completing
/// `course`. A student holds at most one certificate per course; later calls
/// return the existing one.
pub async fn issue_certificate(
    state: &AppState,
    student: &AuthUser,
    course: &courses::Model,
) -> AppResult<CertificateModel> {
    let repo = state.certificates();
    if let Some(existing) = repo.find_for(student.user_id, course.id).await? {
        return Ok(existing);
    }

    let student_name = state
        .users()
        .find_by_id(student.user_id)
        .await?
        .map(|u| u.name)
        .ok_or_else(|| AppError::not_found("Student"))?;
    let instructor_name = state
        .users()
        .find_by_id(course.instructor_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| "SKILLzio Instructor".to_string());

    let id = Uuid::new_v4();
    let issued_at = now();
    let pdf = render_certificate(&CertificateDetails {
        certificate_id: id,
        student_name,
        course_title: course.title.clone(),
        instructor_name,
        issued_on: issued_at.date_naive(),
    })?;
    let storage_key = state
        .storage
        .upload(Bytes::from(pdf), "application/pdf", "certificates")
        .await?;

    let created = repo
        .create(ActiveModel {
            id: Set(id),
            student_id: Set(student.user_id),
            course_id: Set(course.id),
            storage_key: Set(storage_key),
            issued_at: Set(issued_at),
        })
        .await;

    let certificate = match created {
        Ok(certificate) => certificate,
        // Another submission issued it first.
        Err(AppError::Conflict(_)) => repo
            .find_for(student.user_id, course.id)
            .await?
            .ok_or_else(|| AppError::not_found("Certificate"))?,
        Err(err) => return Err(err),
    };

    tracing::info!(certificate_id = %certificate.id, course_id = %course.id, "certificate issued");
    audit::record(
        state,
        student.user_id,
        "certificate_issue",
        "certificates",
        serde_json::json!({ "certificate_id": certificate.id, "course_id": course.id }),
    )
    .await;
    Ok(certificate)
}

pub async fn list_certificates(
    state: &AppState,
    user: &AuthUser,
    params: &ListParams,
) -> AppResult<Page<(CertificateModel, Option<courses::Model>)>> {
    ensure_student(user)?;
    state
        .certificates()
        .list_for_student(user.user_id, params.page, params.limit)
        .await
}
