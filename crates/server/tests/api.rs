use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{
    ServerState,
    types::{account::AccountView, expense::ExpenseView, summary::SummaryView, user::Registered},
};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic(email: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"));
    format!("Basic {token}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str) -> (Registered, String) {
    let email = format!("{name}@example.com");
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        serde_json::from_value(body).unwrap(),
        basic(&email, "secret1"),
    )
}

async fn food_id(app: &Router, auth: &str) -> String {
    let (status, body) = send(app, "GET", "/api/categories?name=food", Some(auth), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|c| c["is_global"] == json!(true))
        .map(|c| c["id"].as_str().unwrap().to_string())
        .unwrap()
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_wrong_credentials_are_401() {
    let app = app().await;
    register(&app, "alice").await;

    let (status, _) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = basic("alice@example.com", "nope-nope");
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&wrong), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn register_then_me_and_duplicate() {
    let app = app().await;
    let (registered, auth) = register(&app, "alice").await;
    assert_eq!(registered.account.balance_minor, 0);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], registered.user.id.as_str());

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "other", "email": "alice@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn expense_flow_over_http() {
    let app = app().await;
    let (registered, auth) = register(&app, "alice").await;
    let account_id = registered.account.id.clone();
    let food = food_id(&app, &auth).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/accounts/{account_id}/income"),
        Some(&auth),
        Some(json!({"amount_minor": 1000, "description": "Salary"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(&auth),
        Some(json!({"category_id": food, "account_id": account_id, "amount_minor": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let expense: ExpenseView = serde_json::from_value(body).unwrap();

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/accounts/{account_id}"),
        Some(&auth),
        None,
    )
    .await;
    let account: AccountView = serde_json::from_value(body).unwrap();
    assert_eq!(account.balance_minor, 900);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/expenses/{}", expense.id),
        Some(&auth),
        Some(json!({"amount_minor": 9999})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/accounts/{account_id}/balance"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(body["balance_minor"], 900);

    let (_, body) = send(&app, "GET", "/api/summary", Some(&auth), None).await;
    let summary: SummaryView = serde_json::from_value(body).unwrap();
    assert_eq!(summary.total_minor, 100);
    assert_eq!(summary.by_category["Food"].count, 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/expenses/{}", expense.id),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/accounts/{account_id}/balance"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(body["balance_minor"], 1000);
}

#[tokio::test]
async fn insufficient_funds_is_422() {
    let app = app().await;
    let (registered, auth) = register(&app, "alice").await;
    let food = food_id(&app, &auth).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(&auth),
        Some(json!({
            "category_id": food,
            "account_id": registered.account.id,
            "amount_minor": 100
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Insufficient funds"));
}

#[tokio::test]
async fn cross_user_access_is_403_and_unknown_is_404() {
    let app = app().await;
    let (alice, _) = register(&app, "alice").await;
    let (_, bob_auth) = register(&app, "bob").await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/accounts/{}", alice.account.id),
        Some(&bob_auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/expenses/missing", Some(&bob_auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn global_category_over_http_is_forbidden() {
    let app = app().await;
    let (_, auth) = register(&app, "alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&auth),
        Some(json!({"name": "Travel", "is_global": true})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/categories",
        Some(&auth),
        Some(json!({"name": "Food"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_global"], false);
}

#[tokio::test]
async fn delete_me_removes_the_user() {
    let app = app().await;
    let (_, auth) = register(&app, "alice").await;

    let (status, _) = send(&app, "DELETE", "/api/users/me", Some(&auth), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
