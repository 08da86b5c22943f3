//! Handlers for the `/task-types` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::color::validate_hex_color;
use precatorios_core::error::CoreError;
use precatorios_core::phase::validate_catalog_name;
use precatorios_core::types::DbId;
use precatorios_db::models::task_type::{CreateTaskType, TaskType, UpdateTaskType};
use precatorios_db::repositories::TaskTypeRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::query::ActiveParams;
use crate::state::AppState;

/// POST /api/v1/task-types
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTaskType>,
) -> AppResult<(StatusCode, Json<TaskType>)> {
    input.validate()?;
    input.name = validate_catalog_name(&input.name)?;
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let task_type = TaskTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(task_type)))
}

/// GET /api/v1/task-types?active=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActiveParams>,
) -> AppResult<Json<Vec<TaskType>>> {
    let task_types = TaskTypeRepo::list(&state.pool, params.active).await?;
    Ok(Json(task_types))
}

/// GET /api/v1/task-types/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskType>> {
    let task_type = TaskTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("TaskType", id))?;
    Ok(Json(task_type))
}

/// PUT /api/v1/task-types/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTaskType>,
) -> AppResult<Json<TaskType>> {
    input.validate()?;
    if let Some(name) = input.name.as_mut() {
        *name = validate_catalog_name(name)?;
    }
    if let Some(color) = input.color.as_deref() {
        validate_hex_color(color)?;
    }
    let task_type = TaskTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("TaskType", id))?;
    Ok(Json(task_type))
}

/// DELETE /api/v1/task-types/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let usage = TaskTypeRepo::usage_count(&state.pool, id).await?;
    if usage > 0 {
        return Err(CoreError::Conflict(format!(
            "Task type {id} is in use by {usage} tasks"
        ))
        .into());
    }
    if TaskTypeRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("TaskType", id).into())
    }
}
