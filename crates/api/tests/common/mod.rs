#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use precatorios_core::clock::FixedClock;
use sqlx::PgPool;
use tower::ServiceExt;

use precatorios_api::config::ServerConfig;
use precatorios_api::router::build_app_router;
use precatorios_api::state::AppState;

/// The date every test app believes is today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        priority_age_threshold_years: 60,
    }
}

/// Build the full application router, with the production middleware stack,
/// over `pool` and a clock pinned to [`today`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock: Arc::new(FixedClock::at_date(today())),
    };
    build_app_router(state, &config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    actor: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("x-actor", actor);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(body)).await
}

/// POST on behalf of `actor` (sent in the `x-actor` header).
pub async fn post_json_as(
    app: Router,
    actor: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(actor), Some(body)).await
}

/// PUT on behalf of `actor` (sent in the `x-actor` header).
pub async fn put_json_as(
    app: Router,
    actor: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(actor), Some(body)).await
}

pub const CNJ: &str = "1234567-89.2023.8.26.0100";

/// Create a person through the API, returning its JSON.
pub async fn create_person(pool: &PgPool, cpf: &str, name: &str, birth_date: Option<&str>) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/persons",
        serde_json::json!({"cpf": cpf, "name": name, "birth_date": birth_date}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Create the [`CNJ`] claim and link `cpf` to it.
pub async fn create_claim_with_person(pool: &PgPool, cpf: &str) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/claims",
        serde_json::json!({"cnj": CNJ, "budget_year": 2024, "origin": "TJSP", "face_value": 150000.0}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/claims/{CNJ}/persons"),
        serde_json::json!({"cpf": cpf}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

/// Create a primary phase, returning its id.
pub async fn create_phase(pool: &PgPool, name: &str, category: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/phases",
        serde_json::json!({"name": name, "category": category}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
