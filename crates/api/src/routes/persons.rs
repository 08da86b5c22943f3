//! Route definitions for the `/persons` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::persons;
use crate::state::AppState;

/// Routes mounted at `/persons`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /stats                     -> stats
/// GET    /{cpf}                     -> get_by_cpf
/// PUT    /{cpf}                     -> update
/// DELETE /{cpf}                     -> delete
/// GET    /{cpf}/priority-requests   -> priority_requests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(persons::list).post(persons::create))
        .route("/stats", get(persons::stats))
        .route(
            "/{cpf}",
            get(persons::get_by_cpf)
                .put(persons::update)
                .delete(persons::delete),
        )
        .route("/{cpf}/priority-requests", get(persons::priority_requests))
}
