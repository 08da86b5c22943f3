//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod claim;
pub mod claim_type;
pub mod document;
pub mod fee_phase;
pub mod person;
pub mod phase;
pub mod request;
pub mod task;
pub mod task_type;
