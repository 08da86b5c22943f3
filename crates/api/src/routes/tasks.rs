//! Route definitions for tasks and the task type catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{task_types, tasks};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/complete     -> complete
/// POST   /{id}/reopen       -> reopen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{id}/complete", post(tasks::complete))
        .route("/{id}/reopen", post(tasks::reopen))
}

/// Routes mounted at `/task-types`.
pub fn type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(task_types::list).post(task_types::create))
        .route(
            "/{id}",
            get(task_types::get_by_id)
                .put(task_types::update)
                .delete(task_types::delete),
        )
}
