//! Handlers for the `/phases` resource (primary workflow phase catalog).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::color::validate_hex_color;
use precatorios_core::error::CoreError;
use precatorios_core::phase::{validate_catalog_name, PhaseCategory, WorkflowKind};
use precatorios_core::types::DbId;
use precatorios_db::models::phase::{CreatePhase, Phase, PhaseFilter, UpdatePhase};
use precatorios_db::repositories::PhaseRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

fn parse_kind(kind: &str) -> Result<WorkflowKind, CoreError> {
    match kind {
        "document" => Ok(WorkflowKind::Document),
        "request" => Ok(WorkflowKind::Request),
        other => Err(CoreError::Validation(format!(
            "Invalid kind '{other}'. Must be one of: document, request"
        ))),
    }
}

/// Normalize and check the catalog fields shared by create and update.
fn check_fields(
    name: Option<&mut String>,
    color: Option<&str>,
    category: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        *name = validate_catalog_name(name)?;
    }
    if let Some(color) = color {
        validate_hex_color(color)?;
    }
    if let Some(category) = category {
        PhaseCategory::parse(category)?;
    }
    Ok(())
}

/// POST /api/v1/phases
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreatePhase>,
) -> AppResult<(StatusCode, Json<Phase>)> {
    input.validate()?;
    check_fields(
        Some(&mut input.name),
        input.color.as_deref(),
        input.category.as_deref(),
    )?;
    let phase = PhaseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(phase)))
}

/// GET /api/v1/phases?kind=document|request&active=
///
/// With `kind`, only phases selectable for that entity kind are returned
/// (its own category plus `both`), and only active ones unless `active` is
/// given explicitly.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PhaseFilter>,
) -> AppResult<Json<Vec<Phase>>> {
    let categories = filter
        .kind
        .as_deref()
        .map(parse_kind)
        .transpose()?
        .map(PhaseCategory::selectable_for);
    let active = match categories {
        Some(_) => filter.active.or(Some(true)),
        None => filter.active,
    };
    let phases = PhaseRepo::list(
        &state.pool,
        categories.as_ref().map(|c| c.as_slice()),
        active,
    )
    .await?;
    Ok(Json(phases))
}

/// GET /api/v1/phases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Phase>> {
    let phase = PhaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Phase", id))?;
    Ok(Json(phase))
}

/// PUT /api/v1/phases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePhase>,
) -> AppResult<Json<Phase>> {
    input.validate()?;
    check_fields(
        input.name.as_mut(),
        input.color.as_deref(),
        input.category.as_deref(),
    )?;
    let phase = PhaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Phase", id))?;
    Ok(Json(phase))
}

/// POST /api/v1/phases/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Phase>> {
    let phase = PhaseRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Phase", id))?;
    tracing::info!(phase_id = id, active = phase.active, "Phase toggled");
    Ok(Json(phase))
}

/// DELETE /api/v1/phases/{id}
///
/// Refused with 409 while any document or request is in the phase.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let usage = PhaseRepo::usage_count(&state.pool, id).await?;
    if usage > 0 {
        return Err(CoreError::Conflict(format!(
            "Phase {id} is in use by {usage} documents or requests"
        ))
        .into());
    }
    if PhaseRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Phase", id).into())
    }
}
