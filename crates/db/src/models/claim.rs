//! Claim (precatório) model and DTOs.

use precatorios_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub cnj: String,
    pub budget_year: i32,
    pub origin: String,
    pub principal_status: String,
    pub contractual_fees_status: String,
    pub succumbence_fees_status: String,
    pub face_value: f64,
    pub last_update_value: Option<f64>,
    pub last_update_date: Option<Date>,
    pub contractual_signed_pct: Option<f64>,
    pub contractual_separate_pct: Option<f64>,
    pub succumbence_pct: Option<f64>,
    /// Entry in the claim type catalog; cleared if that type is deleted.
    pub type_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a claim. `cnj` is validated by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClaim {
    pub cnj: String,
    pub budget_year: i32,
    #[validate(length(min = 1, max = 300))]
    pub origin: String,
    pub principal_status: Option<String>,
    pub contractual_fees_status: Option<String>,
    pub succumbence_fees_status: Option<String>,
    pub face_value: f64,
    pub last_update_value: Option<f64>,
    pub last_update_date: Option<Date>,
    pub contractual_signed_pct: Option<f64>,
    pub contractual_separate_pct: Option<f64>,
    pub succumbence_pct: Option<f64>,
    pub type_id: Option<DbId>,
}

/// DTO for updating a claim. The CNJ itself is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClaim {
    pub budget_year: Option<i32>,
    #[validate(length(min = 1, max = 300))]
    pub origin: Option<String>,
    pub principal_status: Option<String>,
    pub contractual_fees_status: Option<String>,
    pub succumbence_fees_status: Option<String>,
    pub face_value: Option<f64>,
    pub last_update_value: Option<f64>,
    pub last_update_date: Option<Date>,
    pub contractual_signed_pct: Option<f64>,
    pub contractual_separate_pct: Option<f64>,
    pub succumbence_pct: Option<f64>,
    pub type_id: Option<DbId>,
}

/// Query filters for listing claims.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimFilter {
    /// Case-insensitive substring of the origin.
    pub origin: Option<String>,
    pub budget_year: Option<i32>,
    pub principal_status: Option<String>,
    pub type_id: Option<DbId>,
    /// Only claims linked to this person.
    pub cpf: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body for linking a person to a claim.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkPerson {
    pub cpf: String,
}
