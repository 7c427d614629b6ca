mod common;

use sea_orm::ActiveValue::Set;
use skillzio_api::{
    entity::courses,
    error::AppError,
    middleware::auth::Role,
    routes::params::ListParams,
    services::{cart_service, course_service::MAX_PRICE, wishlist_service},
};

#[tokio::test]
async fn cart_totals_and_clear_keeps_courses() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Music").await?;
    let student = common::create_user(state, Role::Student).await?;

    let mut ids = Vec::new();
    for (title, price) in [("Piano", 100), ("Guitar", 250), ("Drums", 50)] {
        let (_, course) = common::published_course(state, category.id, title, price).await?;
        cart_service::add_to_cart(state, &student, course.id).await?;
        ids.push(course.id);
    }

    let params = ListParams { limit: 2, ..ListParams::default() };
    let cart = cart_service::cart_list(state, &student, &params).await?;
    assert_eq!(cart.courses.total, 3);
    assert_eq!(cart.courses.data.len(), 2);
    assert_eq!(cart.total_price, 400);

    let again = cart_service::add_to_cart(state, &student, ids[0]).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    assert_eq!(cart_service::clear_cart(state, &student).await?, 3);
    let cart = cart_service::cart_list(state, &student, &ListParams::default()).await?;
    assert_eq!(cart.courses.total, 0);
    assert_eq!(cart.total_price, 0);
    for id in ids {
        assert!(state.courses().find_by_id(id).await?.is_some());
    }
    Ok(())
}

#[tokio::test]
async fn removing_absent_course_is_a_no_op() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Art").await?;
    let (_, course) = common::published_course(state, category.id, "Sketching", 30).await?;
    let student = common::create_user(state, Role::Student).await?;

    assert_eq!(cart_service::remove_from_cart(state, &student, course.id).await?, 0);
    cart_service::add_to_cart(state, &student, course.id).await?;
    assert_eq!(cart_service::remove_from_cart(state, &student, course.id).await?, 1);
    assert_eq!(wishlist_service::remove_from_wishlist(state, &student, course.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn unpublished_courses_cannot_be_collected() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Cooking").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;
    let draft = common::create_course(state, &instructor, category.id, "Bread", 20).await?;
    let student = common::create_user(state, Role::Student).await?;

    let cart = cart_service::add_to_cart(state, &student, draft.id).await;
    assert!(matches!(cart, Err(AppError::NotFound(_))));
    let wish = wishlist_service::add_to_wishlist(state, &student, draft.id).await;
    assert!(matches!(wish, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn wishlist_membership() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Sports").await?;
    let (_, course) = common::published_course(state, category.id, "Running", 10).await?;
    let student = common::create_user(state, Role::Student).await?;
    let other = common::create_user(state, Role::Student).await?;

    assert!(!wishlist_service::is_in_wishlist(state, &student, course.id).await?);
    wishlist_service::add_to_wishlist(state, &student, course.id).await?;
    assert!(wishlist_service::is_in_wishlist(state, &student, course.id).await?);
    assert!(!wishlist_service::is_in_wishlist(state, &other, course.id).await?);

    let again = wishlist_service::add_to_wishlist(state, &student, course.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let page = wishlist_service::list_wishlist(state, &student, &ListParams::default()).await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].title, "Running");
    Ok(())
}

#[tokio::test]
async fn only_students_keep_carts() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Film").await?;
    let (instructor, course) = common::published_course(state, category.id, "Editing", 80).await?;

    let err = cart_service::add_to_cart(state, &instructor, course.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let err = wishlist_service::list_wishlist(state, &instructor, &ListParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn cart_total_saturates_instead_of_overflowing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Luxury").await?;
    let student = common::create_user(state, Role::Student).await?;

    for title in ["Yachting", "Polo"] {
        let (_, course) = common::published_course(state, category.id, title, MAX_PRICE).await?;
        // Rows written before the price bound existed.
        state
            .courses()
            .update(
                course.id,
                courses::ActiveModel {
                    price: Set(i64::MAX),
                    ..Default::default()
                },
            )
            .await?;
        cart_service::add_to_cart(state, &student, course.id).await?;
    }

    let cart = cart_service::cart_list(state, &student, &ListParams::default()).await?;
    assert_eq!(cart.courses.total, 2);
    assert_eq!(cart.total_price, i64::MAX);
    Ok(())
}

#[tokio::test]
async fn prices_above_the_bound_are_rejected() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let category = common::create_category(state, "Finance").await?;
    let instructor = common::create_user(state, Role::Instructor).await?;

    let err = common::create_course(state, &instructor, category.id, "Hedging", i64::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::BadRequest(_))));
    Ok(())
}
