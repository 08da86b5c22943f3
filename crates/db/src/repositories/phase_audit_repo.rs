//! Conditional phase writes with audit stamping.
//!
//! Each phase slot maps to a phase column plus its `_changed_at` /
//! `_changed_by` pair. A write locks the row, compares the stored phase with
//! the new value, and stamps the pair only when they differ, all in one
//! statement.

use precatorios_core::phase_audit::{PhaseCatalog, PhaseSlot};
use precatorios_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

/// Table and column names backing one phase slot.
struct SlotColumns {
    table: &'static str,
    phase: &'static str,
    changed_at: &'static str,
    changed_by: &'static str,
}

fn slot_columns(slot: PhaseSlot) -> SlotColumns {
    match slot {
        PhaseSlot::DocumentPhase => SlotColumns {
            table: "documents",
            phase: "phase_id",
            changed_at: "phase_changed_at",
            changed_by: "phase_changed_by",
        },
        PhaseSlot::DocumentFeePhase => SlotColumns {
            table: "documents",
            phase: "fee_phase_id",
            changed_at: "fee_phase_changed_at",
            changed_by: "fee_phase_changed_by",
        },
        PhaseSlot::RequestPhase => SlotColumns {
            table: "requests",
            phase: "phase_id",
            changed_at: "phase_changed_at",
            changed_by: "phase_changed_by",
        },
    }
}

/// Row returned by [`PhaseAuditRepo::write_phase`].
#[derive(Debug, Clone, FromRow)]
pub struct PhaseWriteRow {
    pub previous_phase_id: Option<DbId>,
    pub phase_id: Option<DbId>,
    pub changed_at: Option<Timestamp>,
    pub changed_by: Option<String>,
}

/// Catalog row fields needed to validate an assignment.
#[derive(Debug, Clone, FromRow)]
pub struct PhaseRefRow {
    pub id: DbId,
    /// `NULL` for fee phases.
    pub category: Option<String>,
    pub active: bool,
}

pub struct PhaseAuditRepo;

impl PhaseAuditRepo {
    /// Look up a phase in the catalog backing `slot`.
    pub async fn find_phase_ref(
        pool: &PgPool,
        slot: PhaseSlot,
        phase_id: DbId,
    ) -> Result<Option<PhaseRefRow>, sqlx::Error> {
        let query = match slot.catalog() {
            PhaseCatalog::Primary => "SELECT id, category, active FROM phases WHERE id = $1",
            PhaseCatalog::Fee => {
                "SELECT id, NULL::TEXT AS category, active FROM fee_phases WHERE id = $1"
            }
        };
        sqlx::query_as::<_, PhaseRefRow>(query)
            .bind(phase_id)
            .fetch_optional(pool)
            .await
    }

    /// Write `new_phase` into the slot, stamping `actor` / `at` only if the
    /// stored phase differs. Returns `None` if the entity does not exist.
    pub async fn write_phase(
        pool: &PgPool,
        slot: PhaseSlot,
        entity_id: DbId,
        new_phase: Option<DbId>,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<PhaseWriteRow>, sqlx::Error> {
        let SlotColumns {
            table,
            phase,
            changed_at,
            changed_by,
        } = slot_columns(slot);
        let query = format!(
            "UPDATE {table} AS t SET
                {changed_at} = CASE WHEN t.{phase} IS DISTINCT FROM $2
                                    THEN $3 ELSE t.{changed_at} END,
                {changed_by} = CASE WHEN t.{phase} IS DISTINCT FROM $2
                                    THEN $4 ELSE t.{changed_by} END,
                {phase} = $2
             FROM (SELECT id, {phase} AS previous_phase_id
                   FROM {table} WHERE id = $1 FOR UPDATE) AS prev
             WHERE t.id = prev.id
             RETURNING prev.previous_phase_id,
                       t.{phase} AS phase_id,
                       t.{changed_at} AS changed_at,
                       t.{changed_by} AS changed_by"
        );
        sqlx::query_as::<_, PhaseWriteRow>(&query)
            .bind(entity_id)
            .bind(new_phase)
            .bind(at)
            .bind(actor)
            .fetch_optional(pool)
            .await
    }
}
