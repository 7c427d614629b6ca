mod common;

use std::sync::Arc;

use bytes::Bytes;
use skillzio_api::{
    dto::courses::{UpdateChapterRequest, UpdateCourseRequest},
    error::AppError,
    middleware::auth::Role,
    routes::{params::ListParams, views},
    services::{category_service, chapter_service, course_service},
    state::AppState,
    storage::MemoryStorage,
};

#[tokio::test]
async fn chapter_conflicts_name_the_axis() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Rust", 4900).await?;
    chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Ownership", 1)).await?;

    let by_title = chapter_service::create_chapter(state, &instructor, course.id, common::chapter("ownership ", 2))
        .await
        .unwrap_err();
    match by_title {
        AppError::Conflict(message) => {
            assert!(message.contains("title"));
            assert!(!message.contains("number"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let by_number = chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Borrowing", 1))
        .await
        .unwrap_err();
    match by_number {
        AppError::Conflict(message) => {
            assert!(message.contains("number"));
            assert!(!message.contains("title"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    // Other courses may reuse both.
    let other = common::create_course(state, &instructor, category.id, "Go", 3900).await?;
    chapter_service::create_chapter(state, &instructor, other.id, common::chapter("Ownership", 1)).await?;
    Ok(())
}

#[tokio::test]
async fn chapter_update_ignores_itself() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Rust", 4900).await?;
    let first = chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Basics", 1)).await?;
    chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Traits", 2)).await?;

    let same = chapter_service::update_chapter(
        state,
        &instructor,
        course.id,
        first.id,
        UpdateChapterRequest {
            title: Some("BASICS".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(same.title, "BASICS");

    let clash = chapter_service::update_chapter(
        state,
        &instructor,
        course.id,
        first.id,
        UpdateChapterRequest {
            chapter_number: Some(2),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn chapter_search_matches_title_or_number() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Rust", 4900).await?;
    for (title, n) in [("Setup", 1), ("Lifetimes", 2), ("Chapter about 3", 3)] {
        chapter_service::create_chapter(state, &instructor, course.id, common::chapter(title, n)).await?;
    }

    let by_number = ListParams { search: "2".into(), ..ListParams::default() };
    let page = chapter_service::list_chapters(state, &instructor, course.id, &by_number).await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].title, "Lifetimes");

    let by_text_or_number = ListParams { search: "3".into(), ..ListParams::default() };
    let page = chapter_service::list_chapters(state, &instructor, course.id, &by_text_or_number).await?;
    assert_eq!(page.total, 1);

    let all = chapter_service::list_chapters(state, &instructor, course.id, &ListParams::default()).await?;
    let numbers: Vec<i32> = all.data.iter().map(|c| c.chapter_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_edits_a_course() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let owner = common::create_user(state, Role::Instructor).await?;
    let intruder = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &owner, category.id, "Rust", 4900).await?;

    let err = course_service::update_course(
        state,
        &intruder,
        course.id,
        UpdateCourseRequest {
            price: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let updated = course_service::update_course(
        state,
        &owner,
        course.id,
        UpdateCourseRequest {
            price: Some(2500),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.price, 2500);
    assert_eq!(updated.title, "Rust");
    Ok(())
}

#[tokio::test]
async fn publishing_requires_a_chapter() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Rust", 4900).await?;

    let err = course_service::toggle_publish(state, &instructor, course.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Intro", 1)).await?;
    let published = course_service::toggle_publish(state, &instructor, course.id).await?;
    assert!(published.is_published);
    let unpublished = course_service::toggle_publish(state, &instructor, course.id).await?;
    assert!(!unpublished.is_published);
    Ok(())
}

#[tokio::test]
async fn students_see_published_courses_in_listed_categories() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    let open = common::create_category(state, "Open").await?;
    let closed = common::create_category(state, "Closed").await?;

    let (_, visible) = common::published_course(state, open.id, "Visible", 1000).await?;
    common::published_course(state, closed.id, "Hidden by category", 1000).await?;
    let draft_owner = common::create_user(state, Role::Instructor).await?;
    common::create_course(state, &draft_owner, open.id, "Draft", 1000).await?;
    category_service::toggle_listing(state, &admin, closed.id).await?;

    let page = course_service::list_published_courses(state, &ListParams::default(), None).await?;
    assert_eq!(page.total, 1);
    let record = &page.data[0];
    assert_eq!(record.course.id, visible.id);
    assert_eq!(record.category_name.as_deref(), Some("Open"));
    assert!(record.instructor_name.is_some());

    let (detail, chapters) = course_service::get_published_course(state, visible.id).await?;
    assert_eq!(detail.course.title, "Visible");
    assert_eq!(chapters.len(), 1);
    Ok(())
}

#[tokio::test]
async fn thumbnail_upload_stores_object() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Design").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Figma", 0).await?;

    let updated = course_service::upload_thumbnail(
        state,
        &instructor,
        course.id,
        "image/png",
        Bytes::from_static(b"\x89PNG\r\n"),
    )
    .await?;
    let key = updated.thumbnail_key.expect("thumbnail key stored");
    assert!(key.starts_with(&format!("courses/{}/thumbnail/", course.id)));
    assert_eq!(app.storage.get(&key).unwrap().content_type, "image/png");

    let url = state.presign(Some(&key)).await?.unwrap();
    assert!(url.contains(&key));
    Ok(())
}

#[tokio::test]
async fn deleting_a_course_removes_its_chapters() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Programming").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Rust", 4900).await?;
    chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Intro", 1)).await?;

    course_service::delete_course(state, &instructor, course.id).await?;
    assert!(state.courses().find_by_id(course.id).await?.is_none());
    assert_eq!(state.chapters().count_for_course(course.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn chapter_titles_fold_non_ascii_case() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Pastry").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "French baking", 1500).await?;
    chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Éclair", 1)).await?;

    let err = chapter_service::create_chapter(state, &instructor, course.id, common::chapter("éclair", 2))
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(message) => assert!(message.contains("title")),
        other => panic!("expected conflict, got {other:?}"),
    }

    let second = chapter_service::create_chapter(state, &instructor, course.id, common::chapter("Crème brûlée", 2)).await?;
    let renamed = chapter_service::update_chapter(
        state,
        &instructor,
        course.id,
        second.id,
        UpdateChapterRequest {
            title: Some("ÉCLAIR".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(renamed, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn course_listing_survives_media_lost_on_restart() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Photography").await?;
    let (instructor, course) = common::published_course(state, category.id, "Light", 900).await?;
    course_service::upload_thumbnail(state, &instructor, course.id, "image/png", Bytes::from_static(b"\x89PNG")).await?;

    // Same database, empty object store.
    let restarted = AppState::new(state.orm.clone(), Arc::new(MemoryStorage::new()), common::test_config());
    let page = course_service::list_published_courses(&restarted, &ListParams::default(), None).await?;
    let listed = views::courses(&restarted, page.data).await?;
    assert_eq!(listed.len(), 1);
    assert!(listed[0].thumbnail_url.is_some());
    Ok(())
}

#[tokio::test]
async fn demo_video_descriptor_is_persisted() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Dance").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let course = common::create_course(state, &instructor, category.id, "Salsa", 700).await?;

    course_service::upload_demo_video(state, &instructor, course.id, "video/mp4", Bytes::from_static(b"0000ftypmp42")).await?;

    let stored = state.courses().find_by_id(course.id).await?.expect("course");
    let video = stored.demo_video.expect("demo video");
    assert_eq!(video.content_type, "video/mp4");
    assert_eq!(video.size_bytes, 12);
    assert!(app.storage.get(&video.key).is_some());
    Ok(())
}
