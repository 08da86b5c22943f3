/// Domain-level error shared by every crate in the workspace.
///
/// `NotFound` is kept distinct from `Validation` so callers can tell
/// "nothing to address" apart from "bad input".
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a `NotFound` error from any displayable identifier.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
