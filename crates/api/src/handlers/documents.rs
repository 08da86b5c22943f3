//! Handlers for the `/documents` resource (payment authorizations).
//!
//! Ordinary updates never touch phases. The primary phase and the fee phase
//! each have their own endpoint, routed through the phase audit service:
//!
//! - `PUT /documents/{id}/phase`
//! - `PUT /documents/{id}/fee-phase`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::claim::validate_amount;
use precatorios_core::documents::normalize_cpf;
use precatorios_core::error::CoreError;
use precatorios_core::phase_audit::PhaseSlot;
use precatorios_core::types::DbId;
use precatorios_db::models::document::{CreateDocument, Document, DocumentFilter, UpdateDocument};
use precatorios_db::repositories::{ClaimRepo, DocumentRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::CurrentActor;
use crate::handlers::claims::require_claim;
use crate::handlers::phase_change::{self, ChangePhase, PhaseChangeResponse};
use crate::state::AppState;

async fn require_document(state: &AppState, id: DbId) -> AppResult<Document> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Document", id))?;
    Ok(document)
}

fn check_amounts(values: [(&str, Option<f64>); 3]) -> Result<(), CoreError> {
    for (field, value) in values {
        if let Some(value) = value {
            validate_amount(field, value)?;
        }
    }
    Ok(())
}

/// POST /api/v1/documents
///
/// The person must already be linked to the claim. Initial phases, if
/// given, are validated and stamped by the audit service and written by the
/// same insert as the document.
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(mut input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<Document>)> {
    input.validate()?;
    input.person_cpf = normalize_cpf(&input.person_cpf)?;
    check_amounts([
        ("principal_value", Some(input.principal_value)),
        ("contractual_fees", input.contractual_fees),
        ("succumbence_fees", input.succumbence_fees),
    ])?;

    let claim = require_claim(&state, &input.claim_cnj).await?;
    input.claim_cnj = claim.cnj;
    if !ClaimRepo::has_person(&state.pool, &input.claim_cnj, &input.person_cpf).await? {
        return Err(CoreError::Validation(format!(
            "Person {} is not linked to claim {}",
            input.person_cpf, input.claim_cnj
        ))
        .into());
    }

    let audit = state.phase_audit();
    let phase = audit
        .initial_phase(PhaseSlot::DocumentPhase, input.phase_id, actor.actor())
        .await?;
    let fee_phase = audit
        .initial_phase(PhaseSlot::DocumentFeePhase, input.fee_phase_id, actor.actor())
        .await?;

    let document = DocumentRepo::create(&state.pool, &input, &phase, &fee_phase).await?;
    tracing::info!(document_id = document.id, cnj = %document.claim_cnj, "Document created");
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/v1/documents?claim_cnj=&person_cpf=&phase_id=&fee_phase_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<DocumentFilter>,
) -> AppResult<Json<Vec<Document>>> {
    if let Some(cpf) = filter.person_cpf.as_deref() {
        filter.person_cpf = Some(normalize_cpf(cpf)?);
    }
    let documents = DocumentRepo::list(&state.pool, &filter).await?;
    Ok(Json(documents))
}

/// GET /api/v1/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Document>> {
    Ok(Json(require_document(&state, id).await?))
}

/// PUT /api/v1/documents/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<Json<Document>> {
    input.validate()?;
    check_amounts([
        ("principal_value", input.principal_value),
        ("contractual_fees", input.contractual_fees),
        ("succumbence_fees", input.succumbence_fees),
    ])?;
    let document = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Document", id))?;
    Ok(Json(document))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DocumentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Document", id).into())
    }
}

/// PUT /api/v1/documents/{id}/phase
pub async fn change_phase(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    actor: CurrentActor,
    body: Result<Json<ChangePhase>, JsonRejection>,
) -> AppResult<Json<PhaseChangeResponse>> {
    let Json(input) = body?;
    let response =
        phase_change::apply(&state, PhaseSlot::DocumentPhase, id, input.phase_id, &actor).await?;
    Ok(Json(response))
}

/// PUT /api/v1/documents/{id}/fee-phase
pub async fn change_fee_phase(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    actor: CurrentActor,
    body: Result<Json<ChangePhase>, JsonRejection>,
) -> AppResult<Json<PhaseChangeResponse>> {
    let Json(input) = body?;
    let response =
        phase_change::apply(&state, PhaseSlot::DocumentFeePhase, id, input.phase_id, &actor)
            .await?;
    Ok(Json(response))
}
