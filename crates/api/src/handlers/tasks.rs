//! Handlers for the `/tasks` resource (follow-up tasks on a person).
//!
//! Responses carry the deadline state computed against the server clock.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::documents::normalize_cpf;
use precatorios_core::error::CoreError;
use precatorios_core::phase_audit::attribution;
use precatorios_core::task::Urgency;
use precatorios_core::types::{Date, DbId};
use precatorios_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use precatorios_db::repositories::TaskRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::CurrentActor;
use crate::handlers::persons::require_person;
use crate::state::AppState;

/// A task plus its deadline state as of today.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
    pub days_until_deadline: Option<i64>,
}

impl TaskView {
    fn new(task: Task, today: Date) -> Self {
        Self {
            is_overdue: task.is_overdue(today),
            days_until_deadline: task.days_until_deadline(today),
            task,
        }
    }
}

fn view(state: &AppState, task: Task) -> Json<TaskView> {
    Json(TaskView::new(task, state.clock.today()))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskView>)> {
    input.validate()?;
    if let Some(urgency) = input.urgency.as_deref() {
        Urgency::parse(urgency)?;
    }
    input.person_cpf = require_person(&state, &input.person_cpf).await?.cpf;

    let created_by = attribution(actor.actor());
    let task = TaskRepo::create(&state.pool, &input, created_by).await?;
    tracing::info!(task_id = task.id, cpf = %task.person_cpf, created_by, "Task created");
    Ok((StatusCode::CREATED, view(&state, task)))
}

/// GET /api/v1/tasks?person_cpf=&task_type_id=&completed=&urgency=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<TaskFilter>,
) -> AppResult<Json<Vec<TaskView>>> {
    if let Some(urgency) = filter.urgency.as_deref() {
        Urgency::parse(urgency)?;
    }
    if let Some(cpf) = filter.person_cpf.as_deref() {
        filter.person_cpf = Some(normalize_cpf(cpf)?);
    }
    let today = state.clock.today();
    let tasks = TaskRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(|task| TaskView::new(task, today))
        .collect();
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskView>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Task", id))?;
    Ok(view(&state, task))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<TaskView>> {
    input.validate()?;
    if let Some(urgency) = input.urgency.as_deref() {
        Urgency::parse(urgency)?;
    }
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Task", id))?;
    Ok(view(&state, task))
}

/// POST /api/v1/tasks/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    actor: CurrentActor,
) -> AppResult<Json<TaskView>> {
    let task = TaskRepo::complete(
        &state.pool,
        id,
        attribution(actor.actor()),
        state.clock.now(),
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Task", id))?;
    Ok(view(&state, task))
}

/// POST /api/v1/tasks/{id}/reopen
pub async fn reopen(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskView>> {
    let task = TaskRepo::reopen(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Task", id))?;
    Ok(view(&state, task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Task", id).into())
    }
}
