//! HTTP-level tests for `POST /priority/reconcile`.
//!
//! The test app's clock is pinned to 2024-06-15, so with the default
//! 60-year threshold the cutoff is 1964-06-15.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json};
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    common::create_person(pool, "11111111111", "Ana", Some("1950-01-01")).await;
    common::create_person(pool, "22222222222", "Bruno", Some("1964-06-15")).await;
    common::create_person(pool, "33333333333", "Carla", Some("1990-01-01")).await;

    // Deceased with priority: must be demoted.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/persons",
        serde_json::json!({
            "cpf": "44444444444",
            "name": "Davi",
            "birth_date": "1940-01-01",
            "deceased": true,
            "priority": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn priority_of(pool: &PgPool, cpf: &str) -> bool {
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/persons/{cpf}")).await).await;
    json["priority"].as_bool().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reconcile_promotes_and_demotes(pool: PgPool) {
    seed(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/priority/reconcile", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dry_run"], false);
    assert_eq!(json["data"]["age_threshold_years"], 60);
    assert_eq!(json["data"]["cutoff_date"], "1964-06-15");
    assert_eq!(json["data"]["promoted"], 1);
    assert_eq!(json["data"]["demoted"], 1);
    assert_eq!(json["data"]["promotion"]["examples"][0]["cpf"], "11111111111");
    assert!(json["data"]["summary"].is_string());

    assert!(priority_of(&pool, "11111111111").await);
    assert!(!priority_of(&pool, "22222222222").await);
    assert!(!priority_of(&pool, "33333333333").await);
    assert!(!priority_of(&pool, "44444444444").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dry_run_changes_nothing(pool: PgPool) {
    seed(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/priority/reconcile",
        serde_json::json!({"dry_run": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dry_run"], true);
    assert_eq!(json["data"]["promotion"]["planned"], 1);
    assert_eq!(json["data"]["promotion"]["outcome"]["status"], "planned");
    assert_eq!(json["data"]["promoted"], 0);

    assert!(!priority_of(&pool, "11111111111").await);
    assert!(priority_of(&pool, "44444444444").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_threshold_override(pool: PgPool) {
    seed(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/priority/reconcile",
        serde_json::json!({"age_threshold_years": 50}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["promoted"], 2);
    assert!(priority_of(&pool, "22222222222").await);
    assert!(!priority_of(&pool, "33333333333").await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_run_is_a_no_op(pool: PgPool) {
    seed(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_json(app, "/api/v1/priority/reconcile", serde_json::json!({})).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/priority/reconcile", serde_json::json!({})).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["promotion"]["planned"], 0);
    assert_eq!(json["data"]["demotion"]["planned"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manual_priority_on_young_person_is_kept(pool: PgPool) {
    seed(&pool).await;

    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        "/api/v1/persons/33333333333",
        serde_json::json!({"priority": true}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    post_json(app, "/api/v1/priority/reconcile", serde_json::json!({})).await;

    assert!(priority_of(&pool, "33333333333").await);
}
