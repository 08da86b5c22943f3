//! HTTP handlers, one module per resource.

pub mod claim_types;
pub mod claims;
pub mod documents;
pub mod fee_phases;
pub mod persons;
pub mod phase_change;
pub mod phases;
pub mod priority;
pub mod requests;
pub mod task_types;
pub mod tasks;
