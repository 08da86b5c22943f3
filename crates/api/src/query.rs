//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for catalog list endpoints (`?active=`).
#[derive(Debug, Default, Deserialize)]
pub struct ActiveParams {
    pub active: Option<bool>,
}
