//! Shared body and response types for phase change endpoints.

use precatorios_core::phase_audit::{PhaseSlot, PhaseTarget, PhaseUpdate};
use precatorios_core::types::DbId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppResult;
use crate::extract::CurrentActor;
use crate::state::AppState;

/// Body of `PUT .../phase` and `PUT .../fee-phase`.
///
/// `phase_id` must be present: `null` clears the phase, while a missing key
/// is rejected rather than read as a clear.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePhase {
    #[serde(deserialize_with = "present_or_null")]
    pub phase_id: Option<DbId>,
}

/// `Option` deserializer without serde's missing-field default.
fn present_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DbId>, D::Error> {
    Option::<DbId>::deserialize(deserializer)
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseChangeResponse {
    pub entity_id: DbId,
    pub slot: PhaseSlot,
    /// Whether the stored phase actually changed.
    pub changed: bool,
    #[serde(flatten)]
    pub update: PhaseUpdate,
}

/// Run a phase change through the audit service on behalf of `actor`.
pub(crate) async fn apply(
    state: &AppState,
    slot: PhaseSlot,
    entity_id: DbId,
    phase_id: Option<DbId>,
    actor: &CurrentActor,
) -> AppResult<PhaseChangeResponse> {
    let update = state
        .phase_audit()
        .change_phase(PhaseTarget::new(slot, entity_id), phase_id, actor.actor())
        .await?;
    Ok(PhaseChangeResponse {
        entity_id,
        slot,
        changed: update.changed(),
        update,
    })
}
