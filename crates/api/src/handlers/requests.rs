//! Handlers for the `/requests` resource (formal requests on a claim).
//!
//! The phase is changed only through `PUT /requests/{id}/phase`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::claim::validate_amount;
use precatorios_core::documents::normalize_cpf;
use precatorios_core::error::CoreError;
use precatorios_core::phase_audit::PhaseSlot;
use precatorios_core::request_kind::RequestKind;
use precatorios_core::types::DbId;
use precatorios_db::models::request::{CreateRequest, Request, RequestFilter, UpdateRequest};
use precatorios_db::repositories::{ClaimRepo, RequestRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::CurrentActor;
use crate::handlers::claims::require_claim;
use crate::handlers::phase_change::{self, ChangePhase, PhaseChangeResponse};
use crate::state::AppState;

async fn require_request(state: &AppState, id: DbId) -> AppResult<Request> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Request", id))?;
    Ok(request)
}

/// POST /api/v1/requests
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(mut input): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    input.validate()?;
    RequestKind::parse(&input.kind)?;
    validate_amount("amount", input.amount)?;
    input.person_cpf = normalize_cpf(&input.person_cpf)?;

    let claim = require_claim(&state, &input.claim_cnj).await?;
    input.claim_cnj = claim.cnj;
    if !ClaimRepo::has_person(&state.pool, &input.claim_cnj, &input.person_cpf).await? {
        return Err(CoreError::Validation(format!(
            "Person {} is not linked to claim {}",
            input.person_cpf, input.claim_cnj
        ))
        .into());
    }

    let phase = state
        .phase_audit()
        .initial_phase(PhaseSlot::RequestPhase, input.phase_id, actor.actor())
        .await?;

    let request = RequestRepo::create(&state.pool, &input, &phase).await?;
    tracing::info!(request_id = request.id, kind = %request.kind, "Request created");
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/v1/requests?claim_cnj=&person_cpf=&kind=&phase_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<RequestFilter>,
) -> AppResult<Json<Vec<Request>>> {
    if let Some(kind) = filter.kind.as_deref() {
        RequestKind::parse(kind)?;
    }
    if let Some(cpf) = filter.person_cpf.as_deref() {
        filter.person_cpf = Some(normalize_cpf(cpf)?);
    }
    let requests = RequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(requests))
}

/// GET /api/v1/requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Request>> {
    Ok(Json(require_request(&state, id).await?))
}

/// PUT /api/v1/requests/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRequest>,
) -> AppResult<Json<Request>> {
    input.validate()?;
    if let Some(kind) = input.kind.as_deref() {
        RequestKind::parse(kind)?;
    }
    if let Some(amount) = input.amount {
        validate_amount("amount", amount)?;
    }
    let request = RequestRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Request", id))?;
    Ok(Json(request))
}

/// DELETE /api/v1/requests/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if RequestRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Request", id).into())
    }
}

/// PUT /api/v1/requests/{id}/phase
pub async fn change_phase(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    actor: CurrentActor,
    body: Result<Json<ChangePhase>, JsonRejection>,
) -> AppResult<Json<PhaseChangeResponse>> {
    let Json(input) = body?;
    let response =
        phase_change::apply(&state, PhaseSlot::RequestPhase, id, input.phase_id, &actor).await?;
    Ok(Json(response))
}
