//! Route definitions for the `/claims` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{claim_types, claims};
use crate::state::AppState;

/// Routes mounted at `/claims`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{cnj}                  -> get_by_cnj
/// PUT    /{cnj}                  -> update
/// DELETE /{cnj}                  -> delete
/// GET    /{cnj}/persons          -> list_persons
/// POST   /{cnj}/persons          -> link_person
/// DELETE /{cnj}/persons/{cpf}    -> unlink_person
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(claims::list).post(claims::create))
        .route(
            "/{cnj}",
            get(claims::get_by_cnj)
                .put(claims::update)
                .delete(claims::delete),
        )
        .route(
            "/{cnj}/persons",
            get(claims::list_persons).post(claims::link_person),
        )
        .route("/{cnj}/persons/{cpf}", delete(claims::unlink_person))
}

/// Routes mounted at `/claim-types`.
///
/// ```text
/// GET    /              -> list (?active=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/toggle   -> toggle
/// ```
pub fn type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(claim_types::list).post(claim_types::create))
        .route(
            "/{id}",
            get(claim_types::get_by_id)
                .put(claim_types::update)
                .delete(claim_types::delete),
        )
        .route("/{id}/toggle", post(claim_types::toggle))
}
