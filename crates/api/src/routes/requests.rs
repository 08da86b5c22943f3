//! Route definitions for the `/requests` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PUT    /{id}/phase    -> change_phase
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(requests::list).post(requests::create))
        .route(
            "/{id}",
            get(requests::get_by_id)
                .put(requests::update)
                .delete(requests::delete),
        )
        .route("/{id}/phase", put(requests::change_phase))
}
