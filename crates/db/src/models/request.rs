//! Formal request (requerimento) model and DTOs.

use precatorios_core::phase_audit::{AuditPair, TrackedPhase};
use precatorios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Request {
    pub id: DbId,
    pub claim_cnj: String,
    pub person_cpf: String,
    /// One of the `RequestKind` wire values.
    pub kind: String,
    pub amount: f64,
    /// Discount (deságio) percentage applied in agreements.
    pub discount_rate: f64,
    pub phase_id: Option<DbId>,
    pub phase_changed_at: Option<Timestamp>,
    pub phase_changed_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Request {
    pub fn phase(&self) -> TrackedPhase {
        TrackedPhase {
            phase_id: self.phase_id,
            audit: AuditPair {
                changed_at: self.phase_changed_at,
                changed_by: self.phase_changed_by.clone(),
            },
        }
    }
}

/// DTO for creating a request. `phase_id` is applied after insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRequest {
    pub claim_cnj: String,
    pub person_cpf: String,
    pub kind: String,
    pub amount: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_rate: f64,
    pub phase_id: Option<DbId>,
}

/// DTO for updating a request's non-phase fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequest {
    pub kind: Option<String>,
    pub amount: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_rate: Option<f64>,
}

/// Query filters for listing requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    pub claim_cnj: Option<String>,
    pub person_cpf: Option<String>,
    pub kind: Option<String>,
    pub phase_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
