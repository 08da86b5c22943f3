//! Payment authorization document (alvará) model and DTOs.

use precatorios_core::phase_audit::{AuditPair, TrackedPhase};
use precatorios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub claim_cnj: String,
    pub person_cpf: String,
    pub kind: String,
    pub principal_value: f64,
    pub contractual_fees: f64,
    pub succumbence_fees: f64,
    pub phase_id: Option<DbId>,
    pub phase_changed_at: Option<Timestamp>,
    pub phase_changed_by: Option<String>,
    pub fee_phase_id: Option<DbId>,
    pub fee_phase_changed_at: Option<Timestamp>,
    pub fee_phase_changed_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn phase(&self) -> TrackedPhase {
        TrackedPhase {
            phase_id: self.phase_id,
            audit: AuditPair {
                changed_at: self.phase_changed_at,
                changed_by: self.phase_changed_by.clone(),
            },
        }
    }

    pub fn fee_phase(&self) -> TrackedPhase {
        TrackedPhase {
            phase_id: self.fee_phase_id,
            audit: AuditPair {
                changed_at: self.fee_phase_changed_at,
                changed_by: self.fee_phase_changed_by.clone(),
            },
        }
    }
}

/// DTO for creating a document.
///
/// The row is inserted without phases; `phase_id` and `fee_phase_id` are
/// applied afterwards through the phase audit service so the initial
/// assignment is validated and attributed like any other.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocument {
    pub claim_cnj: String,
    pub person_cpf: String,
    #[validate(length(min = 1, max = 100))]
    pub kind: String,
    pub principal_value: f64,
    pub contractual_fees: Option<f64>,
    pub succumbence_fees: Option<f64>,
    pub phase_id: Option<DbId>,
    pub fee_phase_id: Option<DbId>,
}

/// DTO for updating a document's non-phase fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDocument {
    #[validate(length(min = 1, max = 100))]
    pub kind: Option<String>,
    pub principal_value: Option<f64>,
    pub contractual_fees: Option<f64>,
    pub succumbence_fees: Option<f64>,
}

/// Query filters for listing documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    pub claim_cnj: Option<String>,
    pub person_cpf: Option<String>,
    pub phase_id: Option<DbId>,
    pub fee_phase_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
