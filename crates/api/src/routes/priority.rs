use axum::routing::post;
use axum::Router;

use crate::handlers::priority;
use crate::state::AppState;

/// Routes mounted at `/priority`.
///
/// ```text
/// POST   /reconcile   -> reconcile
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/reconcile", post(priority::reconcile))
}
