//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod claim_repo;
pub mod claim_type_repo;
pub mod document_repo;
pub mod fee_phase_repo;
pub mod person_repo;
pub mod phase_audit_repo;
pub mod phase_repo;
pub mod request_repo;
pub mod task_repo;
pub mod task_type_repo;

pub use claim_repo::ClaimRepo;
pub use claim_type_repo::ClaimTypeRepo;
pub use document_repo::DocumentRepo;
pub use fee_phase_repo::FeePhaseRepo;
pub use person_repo::PersonRepo;
pub use phase_audit_repo::PhaseAuditRepo;
pub use phase_repo::PhaseRepo;
pub use request_repo::RequestRepo;
pub use task_repo::TaskRepo;
pub use task_type_repo::TaskTypeRepo;

/// Default page size for list queries.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for list queries.
const MAX_LIMIT: i64 = 500;

/// Resolve optional `limit` / `offset` query parameters into bounded values.
fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        offset.unwrap_or(0).max(0),
    )
}
