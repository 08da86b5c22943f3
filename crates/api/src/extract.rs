//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use precatorios_core::error::CoreError;
use precatorios_core::phase_audit::Actor;

use crate::error::AppError;

/// Header naming the user on whose behalf a request is made.
pub const ACTOR_HEADER: &str = "x-actor";

/// The acting user, taken from the `x-actor` header.
///
/// A missing header yields `CurrentActor(None)`, which audit stamps record
/// as the system actor. A present but blank or over-long header is rejected.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<Actor>);

impl CurrentActor {
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(CurrentActor(None));
        };
        let raw = std::str::from_utf8(value.as_bytes()).map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "{ACTOR_HEADER} header must be valid UTF-8 text"
            )))
        })?;
        Ok(CurrentActor(Some(Actor::new(raw)?)))
    }
}
