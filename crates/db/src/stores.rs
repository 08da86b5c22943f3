//! Postgres implementations of the core store traits.

use async_trait::async_trait;
use precatorios_core::eligibility::Cutoff;
use precatorios_core::error::CoreError;
use precatorios_core::phase::PhaseCategory;
use precatorios_core::phase_audit::{
    AuditPair, PhaseRef, PhaseSlot, PhaseTarget, PhaseUpdate, TrackedPhase, WorkflowEntityStore,
};
use precatorios_core::priority::{PersonRecord, PersonStore};
use precatorios_core::types::{DbId, Timestamp};

use crate::repositories::{PersonRepo, PhaseAuditRepo};
use crate::DbPool;

fn persistence(err: sqlx::Error) -> CoreError {
    CoreError::Persistence(err.to_string())
}

/// [`PersonStore`] backed by the `persons` table.
#[derive(Debug, Clone)]
pub struct PgPersonStore {
    pool: DbPool,
}

impl PgPersonStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn promotion_candidates(&self, cutoff: Cutoff) -> Result<Vec<PersonRecord>, CoreError> {
        let bound = match cutoff {
            Cutoff::BeforeAll => return Ok(Vec::new()),
            Cutoff::AfterAll => None,
            Cutoff::Date(date) => Some(date),
        };
        let persons = PersonRepo::promotion_candidates(&self.pool, bound)
            .await
            .map_err(persistence)?;
        Ok(persons.into_iter().map(PersonRecord::from).collect())
    }

    async fn demotion_candidates(&self) -> Result<Vec<PersonRecord>, CoreError> {
        let persons = PersonRepo::demotion_candidates(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(persons.into_iter().map(PersonRecord::from).collect())
    }

    async fn promote(&self, cpfs: &[String], cutoff: Cutoff) -> Result<u64, CoreError> {
        let bound = match cutoff {
            Cutoff::BeforeAll => return Ok(0),
            Cutoff::AfterAll => None,
            Cutoff::Date(date) => Some(date),
        };
        let updated = PersonRepo::promote(&self.pool, cpfs, bound)
            .await
            .map_err(persistence)?;
        if updated < cpfs.len() as u64 {
            tracing::debug!(
                requested = cpfs.len(),
                updated,
                "Some promotion candidates no longer qualified at write time"
            );
        }
        Ok(updated)
    }

    async fn demote(&self, cpfs: &[String]) -> Result<u64, CoreError> {
        let updated = PersonRepo::demote(&self.pool, cpfs)
            .await
            .map_err(persistence)?;
        if updated < cpfs.len() as u64 {
            tracing::debug!(
                requested = cpfs.len(),
                updated,
                "Some demotion candidates no longer qualified at write time"
            );
        }
        Ok(updated)
    }
}

/// [`WorkflowEntityStore`] backed by the `documents` and `requests` tables.
#[derive(Debug, Clone)]
pub struct PgWorkflowStore {
    pool: DbPool,
}

impl PgWorkflowStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowEntityStore for PgWorkflowStore {
    async fn find_phase(&self, slot: PhaseSlot, phase_id: DbId) -> Result<Option<PhaseRef>, CoreError> {
        let Some(row) = PhaseAuditRepo::find_phase_ref(&self.pool, slot, phase_id)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };
        let category = row
            .category
            .as_deref()
            .map(PhaseCategory::parse)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("Phase {} has a corrupt category: {e}", row.id)))?;
        Ok(Some(PhaseRef {
            id: row.id,
            category,
            active: row.active,
        }))
    }

    async fn update_phase(
        &self,
        target: PhaseTarget,
        new_phase: Option<DbId>,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<PhaseUpdate>, CoreError> {
        let row = PhaseAuditRepo::write_phase(
            &self.pool,
            target.slot,
            target.entity_id,
            new_phase,
            actor,
            at,
        )
        .await
        .map_err(persistence)?;

        Ok(row.map(|row| PhaseUpdate {
            previous_phase_id: row.previous_phase_id,
            current: TrackedPhase {
                phase_id: row.phase_id,
                audit: AuditPair {
                    changed_at: row.changed_at,
                    changed_by: row.changed_by,
                },
            },
        }))
    }
}
