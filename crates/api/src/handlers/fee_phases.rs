//! Handlers for the `/fee-phases` resource (contractual-fee phase catalog).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::color::validate_hex_color;
use precatorios_core::error::CoreError;
use precatorios_core::phase::validate_catalog_name;
use precatorios_core::types::DbId;
use precatorios_db::models::fee_phase::{CreateFeePhase, FeePhase, UpdateFeePhase};
use precatorios_db::repositories::FeePhaseRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::query::ActiveParams;
use crate::state::AppState;

/// POST /api/v1/fee-phases
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateFeePhase>,
) -> AppResult<(StatusCode, Json<FeePhase>)> {
    input.validate()?;
    input.name = validate_catalog_name(&input.name)?;
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let phase = FeePhaseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(phase)))
}

/// GET /api/v1/fee-phases?active=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActiveParams>,
) -> AppResult<Json<Vec<FeePhase>>> {
    let phases = FeePhaseRepo::list(&state.pool, params.active).await?;
    Ok(Json(phases))
}

/// GET /api/v1/fee-phases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<FeePhase>> {
    let phase = FeePhaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("FeePhase", id))?;
    Ok(Json(phase))
}

/// PUT /api/v1/fee-phases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateFeePhase>,
) -> AppResult<Json<FeePhase>> {
    input.validate()?;
    if let Some(name) = input.name.as_mut() {
        *name = validate_catalog_name(name)?;
    }
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let phase = FeePhaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("FeePhase", id))?;
    Ok(Json(phase))
}

/// POST /api/v1/fee-phases/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<FeePhase>> {
    let phase = FeePhaseRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("FeePhase", id))?;
    Ok(Json(phase))
}

/// DELETE /api/v1/fee-phases/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let usage = FeePhaseRepo::usage_count(&state.pool, id).await?;
    if usage > 0 {
        return Err(CoreError::Conflict(format!(
            "Fee phase {id} is in use by {usage} documents"
        ))
        .into());
    }
    if FeePhaseRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("FeePhase", id).into())
    }
}
