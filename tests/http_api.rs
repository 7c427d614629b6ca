mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use skillzio_api::{
    middleware::auth::{AuthUser, Role, issue_token},
    routes::create_app,
    state::AppState,
};
use tower::ServiceExt;

fn bearer(state: &AppState, user: &AuthUser) -> String {
    let token = issue_token(user.user_id, user.role, &state.config.jwt_secret, 1).expect("token");
    format!("Bearer {token}")
}

async fn send(app: &Router, method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let app = create_app(test.state.clone());

    let (status, body) = send(&app, Method::GET, "/api/student/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::GET, "/api/student/courses", Some("Bearer nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrong_role_is_forbidden() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let student = common::create_user(&test.state, Role::Student).await?;
    let auth = bearer(&test.state, &student);
    let app = create_app(test.state.clone());

    let (status, body) = send(&app, Method::GET, "/api/admin/categories", Some(&auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
    Ok(())
}

#[tokio::test]
async fn admin_creates_categories_and_conflicts_are_409() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let admin = common::create_user(&test.state, Role::Admin).await?;
    let auth = bearer(&test.state, &admin);
    let app = create_app(test.state.clone());

    let payload = json!({ "category_name": "Design" });
    let (status, body) = send(&app, Method::POST, "/api/admin/categories", Some(&auth), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["category_name"], "Design");
    assert_eq!(body["data"]["is_listed"], true);

    let payload = json!({ "category_name": "design" });
    let (status, body) = send(&app, Method::POST, "/api/admin/categories", Some(&auth), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, Method::GET, "/api/admin/categories?page=1&limit=5", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["limit"], 5);
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let app = create_app(test.state.clone());

    let payload = json!({
        "name": "Ada",
        "email": "Ada@Example.com",
        "password": "correct horse",
        "role": "student"
    });
    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = send(&app, Method::POST, "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let login = json!({ "email": "ada@example.com", "password": "correct horse" });
    let (status, body) = send(&app, Method::POST, "/api/auth/login", None, Some(login)).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    assert!(token.starts_with("Bearer "));

    let (status, body) = send(&app, Method::GET, "/api/student/courses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);

    let wrong = json!({ "email": "ada@example.com", "password": "wrong horse" });
    let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_routes_use_the_envelope() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let app = create_app(test.state.clone());

    let (status, body) = send(&app, Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["path"], "/api/nowhere");
    Ok(())
}

#[tokio::test]
async fn student_sees_published_course_detail() -> anyhow::Result<()> {
    let test = common::setup().await?;
    let state = &test.state;
    let category = common::create_category(state, "Languages").await?;
    let (_, course) = common::published_course(state, category.id, "Spanish", 40).await?;
    let student = common::create_user(state, Role::Student).await?;
    let auth = bearer(state, &student);
    let app = create_app(state.clone());

    let uri = format!("/api/student/courses/{}", course.id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["course"]["title"], "Spanish");
    assert_eq!(body["data"]["course"]["category_name"], "Languages");
    assert_eq!(body["data"]["chapters"].as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, Method::POST, "/api/student/cart", Some(&auth), Some(json!({ "course_id": course.id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, Method::GET, "/api/student/cart", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_price"], 40);
    Ok(())
}
