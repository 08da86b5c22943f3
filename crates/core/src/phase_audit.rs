//! Phase audit trail.
//!
//! Every phase-valued field on a workflow entity carries an audit pair: when
//! the phase last changed and who changed it. The pair moves in the same
//! write as the phase itself and stays byte-for-byte untouched when the
//! phase does not change. Only the latest change is retained.
//!
//! The acting user is always passed in explicitly. There is no ambient
//! "current user" lookup anywhere in the write path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::phase::{PhaseCategory, WorkflowKind};
use crate::types::{DbId, Timestamp};

/// Attribution recorded when a phase changes without a known actor.
pub const SYSTEM_ACTOR: &str = "system";

/// Maximum stored length of an actor identifier.
pub const MAX_ACTOR_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Identity of whoever is making a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Actor(String);

impl Actor {
    /// Build an actor identity from a display name or username.
    ///
    /// Surrounding whitespace is trimmed; blank or over-long values are
    /// rejected.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Actor must not be empty".into()));
        }
        if trimmed.chars().count() > MAX_ACTOR_LEN {
            return Err(CoreError::Validation(format!(
                "Actor must be at most {MAX_ACTOR_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Actor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Actor::new(value)
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        actor.0
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The attribution string for an optional actor.
pub fn attribution(actor: Option<&Actor>) -> &str {
    actor.map_or(SYSTEM_ACTOR, Actor::as_str)
}

// ---------------------------------------------------------------------------
// Tracked phase fields
// ---------------------------------------------------------------------------

/// Which catalog a phase slot draws its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCatalog {
    /// Primary workflow phases (`phases`), filtered by category.
    Primary,
    /// Contractual-fee phases (`fee_phases`).
    Fee,
}

/// A phase-valued field that carries its own audit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSlot {
    /// Primary workflow phase of a document.
    DocumentPhase,
    /// Contractual-fee phase of a document, tracked independently.
    DocumentFeePhase,
    /// Primary workflow phase of a request.
    RequestPhase,
}

impl PhaseSlot {
    pub fn kind(self) -> WorkflowKind {
        match self {
            PhaseSlot::DocumentPhase | PhaseSlot::DocumentFeePhase => WorkflowKind::Document,
            PhaseSlot::RequestPhase => WorkflowKind::Request,
        }
    }

    pub fn catalog(self) -> PhaseCatalog {
        match self {
            PhaseSlot::DocumentFeePhase => PhaseCatalog::Fee,
            PhaseSlot::DocumentPhase | PhaseSlot::RequestPhase => PhaseCatalog::Primary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseSlot::DocumentPhase => "document_phase",
            PhaseSlot::DocumentFeePhase => "document_fee_phase",
            PhaseSlot::RequestPhase => "request_phase",
        }
    }
}

/// Addresses one phase slot on one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseTarget {
    pub slot: PhaseSlot,
    pub entity_id: DbId,
}

impl PhaseTarget {
    pub fn new(slot: PhaseSlot, entity_id: DbId) -> Self {
        Self { slot, entity_id }
    }
}

/// When and by whom a phase slot last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPair {
    pub changed_at: Option<Timestamp>,
    pub changed_by: Option<String>,
}

/// A phase slot's current value together with its audit pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPhase {
    pub phase_id: Option<DbId>,
    pub audit: AuditPair,
}

impl TrackedPhase {
    /// Set the phase, stamping the audit pair only if the value changes.
    ///
    /// `None -> Some`, `Some -> None` and `Some(a) -> Some(b)` all count as
    /// changes. Returns whether the phase changed. Stores that cannot express
    /// this as a single conditional write should apply it under a row lock.
    pub fn apply(&mut self, new_phase: Option<DbId>, actor: &str, at: Timestamp) -> bool {
        if self.phase_id == new_phase {
            return false;
        }
        self.phase_id = new_phase;
        self.audit = AuditPair {
            changed_at: Some(at),
            changed_by: Some(actor.to_string()),
        };
        true
    }
}

/// Result of a phase write as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseUpdate {
    /// Phase value before the write.
    pub previous_phase_id: Option<DbId>,
    /// Phase value and audit pair after the write.
    pub current: TrackedPhase,
}

impl PhaseUpdate {
    pub fn changed(&self) -> bool {
        self.previous_phase_id != self.current.phase_id
    }
}

/// Catalog facts needed to validate a phase assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRef {
    pub id: DbId,
    /// `None` for catalogs without categories (fee phases).
    pub category: Option<PhaseCategory>,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence operations for phase slots on workflow entities.
#[async_trait]
pub trait WorkflowEntityStore: Send + Sync {
    /// Look up a phase in the catalog that backs `slot`.
    async fn find_phase(&self, slot: PhaseSlot, phase_id: DbId) -> Result<Option<PhaseRef>, CoreError>;

    /// Atomically write `new_phase` into the target slot, stamping the audit
    /// pair with `actor` and `at` only if the stored value differs.
    ///
    /// Returns `None` if the entity does not exist.
    async fn update_phase(
        &self,
        target: PhaseTarget,
        new_phase: Option<DbId>,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<PhaseUpdate>, CoreError>;
}

#[async_trait]
impl<S: WorkflowEntityStore + ?Sized> WorkflowEntityStore for std::sync::Arc<S> {
    async fn find_phase(&self, slot: PhaseSlot, phase_id: DbId) -> Result<Option<PhaseRef>, CoreError> {
        (**self).find_phase(slot, phase_id).await
    }

    async fn update_phase(
        &self,
        target: PhaseTarget,
        new_phase: Option<DbId>,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<PhaseUpdate>, CoreError> {
        (**self).update_phase(target, new_phase, actor, at).await
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Validates and performs phase changes with attribution.
pub struct PhaseAuditService<S, C> {
    store: S,
    clock: C,
}

impl<S: WorkflowEntityStore, C: Clock> PhaseAuditService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Move the target slot to `new_phase` on behalf of `actor`.
    ///
    /// Clearing the phase (`None`) is always allowed. Assigning a phase
    /// requires it to exist in the slot's catalog, be active, and (for
    /// primary phases) belong to a category that applies to the entity kind.
    pub async fn change_phase(
        &self,
        target: PhaseTarget,
        new_phase: Option<DbId>,
        actor: Option<&Actor>,
    ) -> Result<PhaseUpdate, CoreError> {
        if let Some(phase_id) = new_phase {
            self.validate_assignment(target.slot, phase_id).await?;
        }

        let by = attribution(actor);
        let update = self
            .store
            .update_phase(target, new_phase, by, self.clock.now())
            .await?
            .ok_or_else(|| CoreError::not_found(target.slot.kind().entity_name(), target.entity_id))?;

        tracing::debug!(
            entity_id = target.entity_id,
            slot = target.slot.as_str(),
            actor = by,
            changed = update.changed(),
            "Phase write"
        );
        Ok(update)
    }

    /// Validate the phase a new entity starts in and stamp its audit pair.
    ///
    /// The result is written by the same insert that creates the entity.
    /// Without a phase the slot starts empty with no audit pair.
    pub async fn initial_phase(
        &self,
        slot: PhaseSlot,
        phase_id: Option<DbId>,
        actor: Option<&Actor>,
    ) -> Result<TrackedPhase, CoreError> {
        let mut tracked = TrackedPhase::default();
        if let Some(phase_id) = phase_id {
            self.validate_assignment(slot, phase_id).await?;
            tracked.apply(Some(phase_id), attribution(actor), self.clock.now());
        }
        Ok(tracked)
    }

    /// Check that `phase_id` may be assigned to `slot` without writing.
    pub async fn validate_assignment(&self, slot: PhaseSlot, phase_id: DbId) -> Result<(), CoreError> {
        let phase = self.store.find_phase(slot, phase_id).await?.ok_or_else(|| {
            CoreError::Validation(format!("Phase {phase_id} does not exist"))
        })?;

        if let Some(category) = phase.category {
            let kind = slot.kind();
            if !category.applies_to(kind) {
                return Err(CoreError::Validation(format!(
                    "Phase {phase_id} ({}) cannot be assigned to a {}",
                    category.as_str(),
                    kind.entity_name().to_lowercase()
                )));
            }
        }
        if !phase.active {
            return Err(CoreError::Validation(format!(
                "Phase {phase_id} is inactive"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn apply_stamps_audit_on_change() {
        let mut tracked = TrackedPhase::default();
        assert!(tracked.apply(Some(3), "ana", at(9)));
        assert_eq!(tracked.phase_id, Some(3));
        assert_eq!(tracked.audit.changed_at, Some(at(9)));
        assert_eq!(tracked.audit.changed_by.as_deref(), Some("ana"));
    }

    #[test]
    fn apply_same_phase_leaves_audit_untouched() {
        let mut tracked = TrackedPhase::default();
        tracked.apply(Some(3), "ana", at(9));
        let before = tracked.clone();
        assert!(!tracked.apply(Some(3), "bruno", at(10)));
        assert_eq!(tracked, before);
    }

    #[test]
    fn clearing_phase_counts_as_change() {
        let mut tracked = TrackedPhase::default();
        tracked.apply(Some(3), "ana", at(9));
        assert!(tracked.apply(None, "bruno", at(10)));
        assert_eq!(tracked.phase_id, None);
        assert_eq!(tracked.audit.changed_by.as_deref(), Some("bruno"));
        assert_eq!(tracked.audit.changed_at, Some(at(10)));
    }

    #[test]
    fn none_to_none_is_not_a_change() {
        let mut tracked = TrackedPhase::default();
        assert!(!tracked.apply(None, "ana", at(9)));
        assert_eq!(tracked.audit, AuditPair::default());
    }

    #[test]
    fn missing_actor_is_attributed_to_system() {
        assert_eq!(attribution(None), SYSTEM_ACTOR);
        let actor = Actor::new("maria").unwrap();
        assert_eq!(attribution(Some(&actor)), "maria");
    }

    #[test]
    fn actor_is_trimmed_and_validated() {
        assert_eq!(Actor::new("  joão ").unwrap().as_str(), "joão");
        assert!(Actor::new("   ").is_err());
        assert!(Actor::new("x".repeat(MAX_ACTOR_LEN + 1)).is_err());
    }

    #[test]
    fn actor_deserializes_through_validation() {
        let ok: Actor = serde_json::from_str("\"ana\"").unwrap();
        assert_eq!(ok.as_str(), "ana");
        assert!(serde_json::from_str::<Actor>("\"  \"").is_err());
    }

    #[test]
    fn slots_map_to_kinds_and_catalogs() {
        assert_eq!(PhaseSlot::DocumentPhase.kind(), WorkflowKind::Document);
        assert_eq!(PhaseSlot::DocumentFeePhase.kind(), WorkflowKind::Document);
        assert_eq!(PhaseSlot::RequestPhase.kind(), WorkflowKind::Request);
        assert_eq!(PhaseSlot::DocumentFeePhase.catalog(), PhaseCatalog::Fee);
        assert_eq!(PhaseSlot::RequestPhase.catalog(), PhaseCatalog::Primary);
    }

    #[test]
    fn update_reports_change() {
        let update = PhaseUpdate {
            previous_phase_id: Some(1),
            current: TrackedPhase {
                phase_id: Some(1),
                audit: AuditPair::default(),
            },
        };
        assert!(!update.changed());
    }
}
