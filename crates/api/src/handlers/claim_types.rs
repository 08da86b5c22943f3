//! Handlers for the `/claim-types` resource (claim type catalog).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::color::validate_hex_color;
use precatorios_core::error::CoreError;
use precatorios_core::phase::validate_catalog_name;
use precatorios_core::types::DbId;
use precatorios_db::models::claim_type::{ClaimType, CreateClaimType, UpdateClaimType};
use precatorios_db::repositories::ClaimTypeRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::query::ActiveParams;
use crate::state::AppState;

/// Check that a claim may be given type `id`: it must exist and be active.
pub(crate) async fn require_assignable(state: &AppState, id: DbId) -> AppResult<()> {
    let claim_type = ClaimTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Claim type {id} does not exist")))?;
    if !claim_type.active {
        return Err(CoreError::Validation(format!("Claim type {id} is inactive")).into());
    }
    Ok(())
}

/// POST /api/v1/claim-types
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateClaimType>,
) -> AppResult<(StatusCode, Json<ClaimType>)> {
    input.validate()?;
    input.name = validate_catalog_name(&input.name)?;
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let claim_type = ClaimTypeRepo::create(&state.pool, &input).await?;
    tracing::info!(claim_type_id = claim_type.id, name = %claim_type.name, "Claim type created");
    Ok((StatusCode::CREATED, Json(claim_type)))
}

/// GET /api/v1/claim-types?active=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActiveParams>,
) -> AppResult<Json<Vec<ClaimType>>> {
    let types = ClaimTypeRepo::list(&state.pool, params.active).await?;
    Ok(Json(types))
}

/// GET /api/v1/claim-types/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ClaimType>> {
    let claim_type = ClaimTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("ClaimType", id))?;
    Ok(Json(claim_type))
}

/// PUT /api/v1/claim-types/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateClaimType>,
) -> AppResult<Json<ClaimType>> {
    input.validate()?;
    if let Some(name) = input.name.as_mut() {
        *name = validate_catalog_name(name)?;
    }
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let claim_type = ClaimTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("ClaimType", id))?;
    Ok(Json(claim_type))
}

/// POST /api/v1/claim-types/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ClaimType>> {
    let claim_type = ClaimTypeRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("ClaimType", id))?;
    Ok(Json(claim_type))
}

/// DELETE /api/v1/claim-types/{id}
///
/// Refused while claims carry the type. The foreign key would otherwise
/// leave those claims untyped.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let usage = ClaimTypeRepo::usage_count(&state.pool, id).await?;
    if usage > 0 {
        return Err(CoreError::Conflict(format!(
            "Claim type {id} is in use by {usage} claims"
        ))
        .into());
    }
    if ClaimTypeRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("ClaimType", id).into())
    }
}
