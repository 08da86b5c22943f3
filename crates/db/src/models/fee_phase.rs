//! Contractual-fee phase catalog model and DTOs.

use precatorios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `fee_phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeePhase {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFeePhase {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFeePhase {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}
