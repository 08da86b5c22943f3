//! Route definitions for the two phase catalogs.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{fee_phases, phases};
use crate::state::AppState;

/// Routes mounted at `/phases`.
///
/// ```text
/// GET    /              -> list (?kind=document|request, ?active=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(phases::list).post(phases::create))
        .route(
            "/{id}",
            get(phases::get_by_id)
                .put(phases::update)
                .delete(phases::delete),
        )
        .route("/{id}/toggle", post(phases::toggle))
}

/// Routes mounted at `/fee-phases`. Same shape as [`router`].
pub fn fee_router() -> Router<AppState> {
    Router::new()
        .route("/", get(fee_phases::list).post(fee_phases::create))
        .route(
            "/{id}",
            get(fee_phases::get_by_id)
                .put(fee_phases::update)
                .delete(fee_phases::delete),
        )
        .route("/{id}/toggle", post(fee_phases::toggle))
}
