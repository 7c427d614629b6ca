mod common;

use skillzio_api::{
    error::AppError,
    middleware::auth::Role,
    routes::params::ListParams,
    services::category_service::{self, CategoryScope},
};

#[tokio::test]
async fn duplicate_name_in_any_case_conflicts() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    let original = category_service::create_category(state, &admin, "Science").await?;

    let err = category_service::create_category(state, &admin, "  sCiEnCe ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = state.categories().find_by_id(original.id).await?.unwrap();
    assert_eq!(stored, original);
    assert_eq!(state.categories().count(sea_orm::Condition::all()).await?, 1);
    Ok(())
}

#[tokio::test]
async fn rename_conflicts_only_with_other_categories() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    let art = category_service::create_category(state, &admin, "Art").await?;
    category_service::create_category(state, &admin, "Music").await?;

    let renamed = category_service::update_category(state, &admin, art.id, "ART").await?;
    assert_eq!(renamed.category_name, "ART");

    let err = category_service::update_category(state, &admin, art.id, "music")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn toggling_twice_restores_listing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    let category = category_service::create_category(state, &admin, "Design").await?;
    assert!(category.is_listed);

    let once = category_service::toggle_listing(state, &admin, category.id).await?;
    assert!(!once.is_listed);
    let twice = category_service::toggle_listing(state, &admin, category.id).await?;
    assert!(twice.is_listed);

    let missing = category_service::toggle_listing(state, &admin, uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn find_by_name_ignores_case() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    common::create_category(state, "science").await?;

    let found = category_service::find_category_by_name(state, "Science").await?;
    assert_eq!(found.map(|c| c.category_name), Some("science".to_string()));
    assert!(category_service::find_category_by_name(state, "Sci").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unlisted_categories_are_admin_only() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    let student = common::create_user(state, Role::Student).await?;
    let hidden = category_service::create_category(state, &admin, "Hidden").await?;
    category_service::create_category(state, &admin, "Visible").await?;
    category_service::toggle_listing(state, &admin, hidden.id).await?;

    let params = ListParams::default();
    let admin_view = category_service::list_categories(state, &admin, &params).await?;
    let student_view = category_service::list_categories(state, &student, &params).await?;
    assert_eq!(admin_view.total, 2);
    assert_eq!(student_view.total, 1);
    assert_eq!(student_view.data[0].category_name, "Visible");

    assert_eq!(CategoryScope::for_role(Role::Instructor), CategoryScope::ListedOnly);
    Ok(())
}

#[tokio::test]
async fn list_search_is_case_insensitive() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let admin = common::create_user(state, Role::Admin).await?;
    for name in ["Web Development", "Mobile Development", "Cooking"] {
        category_service::create_category(state, &admin, name).await?;
    }

    let params = ListParams {
        search: "DEVELOP".into(),
        ..ListParams::default()
    };
    let page = category_service::list_categories(state, &admin, &params).await?;
    assert_eq!(page.total, 2);
    Ok(())
}

#[tokio::test]
async fn only_admins_manage_categories() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let instructor = common::create_user(state, Role::Instructor).await?;

    let err = category_service::create_category(state, &instructor, "Nope")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert!(matches!(
        category_service::create_category(state, &common::create_user(state, Role::Admin).await?, "   ").await,
        Err(AppError::BadRequest(_))
    ));
    Ok(())
}
