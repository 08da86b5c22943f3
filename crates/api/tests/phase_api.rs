//! HTTP-level tests for phase catalogs and audited phase changes.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, put_json_as};
use sqlx::PgPool;

const CPF: &str = "12345678909";

async fn setup_document(pool: &PgPool) -> i64 {
    common::create_person(pool, CPF, "Maria da Silva", Some("1950-03-01")).await;
    common::create_claim_with_person(pool, CPF).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/documents",
        serde_json::json!({
            "claim_cnj": common::CNJ,
            "person_cpf": CPF,
            "kind": "alvara",
            "principal_value": 50000.0,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_phase_applies_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/phases",
        serde_json::json!({"name": "  Aguardando Depósito "}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Aguardando Depósito");
    assert_eq!(json["category"], "both");
    assert_eq!(json["color"], "#6c757d");
    assert_eq!(json["active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_phase_rejects_bad_color_and_category(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/phases",
        serde_json::json!({"name": "Red", "color": "red"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/phases",
        serde_json::json!({"name": "Odd", "category": "alvara"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_phases_for_kind_includes_both(pool: PgPool) {
    common::create_phase(&pool, "Doc only", "document").await;
    common::create_phase(&pool, "Req only", "request").await;
    common::create_phase(&pool, "Shared", "both").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/phases?kind=request").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Req only"));
    assert!(names.contains(&"Shared"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_phase_in_use_returns_409(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/phases/{phase_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Audited phase changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_phase_change_records_actor_from_header(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_as(
        app,
        "ana.souza",
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["changed"], true);
    assert_eq!(json["slot"], "document_phase");
    assert!(json["previous_phase_id"].is_null());
    assert_eq!(json["current"]["phase_id"], phase_id);
    assert_eq!(json["current"]["audit"]["changed_by"], "ana.souza");
    assert_eq!(json["current"]["audit"]["changed_at"], "2024-06-15T00:00:00Z");

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/documents/{document_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["phase_id"], phase_id);
    assert_eq!(json["phase_changed_by"], "ana.souza");
    assert!(json["fee_phase_changed_by"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_phase_change_without_header_uses_system_actor(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "both").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["current"]["audit"]["changed_by"], "system");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_phase_change_without_phase_id_key_is_rejected(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for body in [serde_json::json!({}), serde_json::json!({"phase": null})] {
        let app = common::build_test_app(pool.clone());
        let response = put_json(app, &format!("/api/v1/documents/{document_id}/phase"), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/documents/{document_id}")).await).await;
    assert_eq!(json["phase_id"], phase_id);

    // An explicit null still clears.
    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["current"]["phase_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeating_same_phase_keeps_original_stamp(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;
    let uri = format!("/api/v1/documents/{document_id}/phase");

    let app = common::build_test_app(pool.clone());
    put_json_as(app, "ana.souza", &uri, serde_json::json!({"phase_id": phase_id})).await;

    let app = common::build_test_app(pool);
    let response = put_json_as(app, "bruno", &uri, serde_json::json!({"phase_id": phase_id})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["changed"], false);
    assert_eq!(json["current"]["audit"]["changed_by"], "ana.souza");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ordinary_update_does_not_touch_phase_audit(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    put_json_as(
        app,
        "ana.souza",
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = put_json_as(
        app,
        "bruno",
        &format!("/api/v1/documents/{document_id}"),
        serde_json::json!({"principal_value": 60000.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["principal_value"], 60000.0);
    assert_eq!(json["phase_changed_by"], "ana.souza");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fee_phase_tracked_independently(pool: PgPool) {
    let document_id = setup_document(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/fee-phases",
        serde_json::json!({"name": "Honorários Pagos"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let fee_phase_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json_as(
        app,
        "carla",
        &format!("/api/v1/documents/{document_id}/fee-phase"),
        serde_json::json!({"phase_id": fee_phase_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/documents/{document_id}")).await).await;
    assert_eq!(json["fee_phase_id"], fee_phase_id);
    assert_eq!(json["fee_phase_changed_by"], "carla");
    assert!(json["phase_id"].is_null());
    assert!(json["phase_changed_by"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_phase_from_document_category_rejected(pool: PgPool) {
    common::create_person(&pool, CPF, "Maria", None).await;
    common::create_claim_with_person(&pool, CPF).await;
    let phase_id = common::create_phase(&pool, "Doc only", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/requests",
        serde_json::json!({
            "claim_cnj": common::CNJ,
            "person_cpf": CPF,
            "kind": "priority_age",
            "amount": 0.0,
            "discount_rate": 0.0,
            "phase_id": phase_id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was inserted.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/requests").await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_created_with_initial_phase_is_stamped(pool: PgPool) {
    common::create_person(&pool, CPF, "Maria", None).await;
    common::create_claim_with_person(&pool, CPF).await;
    let phase_id = common::create_phase(&pool, "Protocolado", "request").await;

    let app = common::build_test_app(pool);
    let response = common::post_json_as(
        app,
        "ana.souza",
        "/api/v1/requests",
        serde_json::json!({
            "claim_cnj": common::CNJ,
            "person_cpf": CPF,
            "kind": "agreement_principal",
            "amount": 25000.0,
            "discount_rate": 40.0,
            "phase_id": phase_id,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["phase_id"], phase_id);
    assert_eq!(json["phase_changed_by"], "ana.souza");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_created_with_both_phases_is_stamped(pool: PgPool) {
    common::create_person(&pool, CPF, "Maria", None).await;
    common::create_claim_with_person(&pool, CPF).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/fee-phases",
        serde_json::json!({"name": "Honorários Pendentes"}),
    )
    .await;
    let fee_phase_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = common::post_json_as(
        app,
        "bruno",
        "/api/v1/documents",
        serde_json::json!({
            "claim_cnj": common::CNJ,
            "person_cpf": CPF,
            "kind": "alvara",
            "principal_value": 12000.0,
            "phase_id": phase_id,
            "fee_phase_id": fee_phase_id,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["phase_id"], phase_id);
    assert_eq!(json["phase_changed_by"], "bruno");
    assert_eq!(json["phase_changed_at"], "2024-06-15T00:00:00Z");
    assert_eq!(json["fee_phase_id"], fee_phase_id);
    assert_eq!(json["fee_phase_changed_by"], "bruno");
    assert_eq!(json["fee_phase_changed_at"], "2024-06-15T00:00:00Z");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_with_invalid_fee_phase_is_not_created(pool: PgPool) {
    common::create_person(&pool, CPF, "Maria", None).await;
    common::create_claim_with_person(&pool, CPF).await;
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/documents",
        serde_json::json!({
            "claim_cnj": common::CNJ,
            "person_cpf": CPF,
            "kind": "alvara",
            "principal_value": 12000.0,
            "phase_id": phase_id,
            "fee_phase_id": 999999,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/documents").await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_phase_rejected(pool: PgPool) {
    let document_id = setup_document(&pool).await;
    let phase_id = common::create_phase(&pool, "Arquivado", "document").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(app, &format!("/api/v1/phases/{phase_id}/toggle"), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["active"], false);

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_phase_change_on_missing_document_returns_404(pool: PgPool) {
    let phase_id = common::create_phase(&pool, "Expedido", "document").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        "/api/v1/documents/999999/phase",
        serde_json::json!({"phase_id": phase_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_actor_header_rejected(pool: PgPool) {
    let document_id = setup_document(&pool).await;

    let app = common::build_test_app(pool);
    let response = put_json_as(
        app,
        "   ",
        &format!("/api/v1/documents/{document_id}/phase"),
        serde_json::json!({"phase_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
