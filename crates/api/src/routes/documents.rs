//! Route definitions for the `/documents` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PUT    /{id}/phase        -> change_phase
/// PUT    /{id}/fee-phase    -> change_fee_phase
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::list).post(documents::create))
        .route(
            "/{id}",
            get(documents::get_by_id)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route("/{id}/phase", put(documents::change_phase))
        .route("/{id}/fee-phase", put(documents::change_fee_phase))
}
