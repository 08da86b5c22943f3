//! Primary workflow phase catalog model and DTOs.

use precatorios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Phase {
    pub id: DbId,
    pub name: String,
    pub description: String,
    /// `#RRGGBB`.
    pub color: String,
    /// `document`, `request` or `both`.
    pub category: String,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePhase {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub color: Option<String>,
    /// Defaults to `both`.
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePhase {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

/// Query filters for listing phases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseFilter {
    /// Only phases selectable for this entity kind (`document` or `request`).
    pub kind: Option<String>,
    pub active: Option<bool>,
}
