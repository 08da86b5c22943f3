//! Business rules for the precatórios record system.
//!
//! Zero internal dependencies: everything here can be used by the database
//! layer, the HTTP API, and the batch worker alike. Storage is reached only
//! through the [`priority::PersonStore`] and
//! [`phase_audit::WorkflowEntityStore`] traits.

pub mod claim;
pub mod clock;
pub mod color;
pub mod documents;
pub mod eligibility;
pub mod error;
pub mod phase;
pub mod phase_audit;
pub mod priority;
pub mod request_kind;
pub mod task;
pub mod types;
