//! In-memory store implementations shared by the core integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use precatorios_core::eligibility::Cutoff;
use precatorios_core::error::CoreError;
use precatorios_core::phase::{PhaseCategory, WorkflowKind};
use precatorios_core::phase_audit::{
    PhaseCatalog, PhaseRef, PhaseSlot, PhaseTarget, PhaseUpdate, TrackedPhase, WorkflowEntityStore,
};
use precatorios_core::priority::{PersonRecord, PersonStore};
use precatorios_core::types::{Date, DbId, Timestamp};

pub fn date(y: i32, m: u32, d: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn person(cpf: &str, name: &str, born: Option<Date>, deceased: bool, priority: bool) -> PersonRecord {
    PersonRecord {
        cpf: cpf.to_string(),
        name: name.to_string(),
        birth_date: born,
        deceased,
        priority,
    }
}

// ---------------------------------------------------------------------------
// Persons
// ---------------------------------------------------------------------------

/// Person store backed by a mutex-guarded map keyed by CPF.
#[derive(Default)]
pub struct MemoryPersonStore {
    persons: Mutex<BTreeMap<String, PersonRecord>>,
    /// When set, batch updates writing this priority value fail.
    fail_writes_of: Mutex<Option<bool>>,
}

impl MemoryPersonStore {
    pub fn with(persons: impl IntoIterator<Item = PersonRecord>) -> Self {
        let store = Self::default();
        {
            let mut map = store.persons.lock().unwrap();
            for p in persons {
                map.insert(p.cpf.clone(), p);
            }
        }
        store
    }

    pub fn fail_writes_of(&self, priority: bool) {
        *self.fail_writes_of.lock().unwrap() = Some(priority);
    }

    pub fn clear_failures(&self) {
        *self.fail_writes_of.lock().unwrap() = None;
    }

    pub fn snapshot(&self) -> Vec<PersonRecord> {
        self.persons.lock().unwrap().values().cloned().collect()
    }

    pub fn get(&self, cpf: &str) -> PersonRecord {
        self.persons.lock().unwrap()[cpf].clone()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn promotion_candidates(&self, cutoff: Cutoff) -> Result<Vec<PersonRecord>, CoreError> {
        tokio::task::yield_now().await;
        Ok(self
            .persons
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.deceased && !p.priority)
            .filter(|p| p.birth_date.is_some_and(|b| cutoff.is_before(b)))
            .cloned()
            .collect())
    }

    async fn demotion_candidates(&self) -> Result<Vec<PersonRecord>, CoreError> {
        tokio::task::yield_now().await;
        Ok(self
            .persons
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.deceased && p.priority)
            .cloned()
            .collect())
    }

    async fn promote(&self, cpfs: &[String], cutoff: Cutoff) -> Result<u64, CoreError> {
        self.write(cpfs, true, |p| {
            !p.deceased && p.birth_date.is_some_and(|b| cutoff.is_before(b))
        })
        .await
    }

    async fn demote(&self, cpfs: &[String]) -> Result<u64, CoreError> {
        self.write(cpfs, false, |p| p.deceased).await
    }
}

impl MemoryPersonStore {
    /// Set `priority` on listed rows that still satisfy `qualifies`.
    async fn write(
        &self,
        cpfs: &[String],
        priority: bool,
        qualifies: impl Fn(&PersonRecord) -> bool,
    ) -> Result<u64, CoreError> {
        tokio::task::yield_now().await;
        if *self.fail_writes_of.lock().unwrap() == Some(priority) {
            return Err(CoreError::Persistence("simulated write failure".into()));
        }
        let mut map = self.persons.lock().unwrap();
        let mut changed = 0;
        for cpf in cpfs {
            if let Some(p) = map.get_mut(cpf) {
                if p.priority != priority && qualifies(p) {
                    p.priority = priority;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}

// ---------------------------------------------------------------------------
// Workflow entities
// ---------------------------------------------------------------------------

/// A workflow entity with one unrelated field and its tracked phase slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryEntity {
    pub description: String,
    pub slots: HashMap<PhaseSlot, TrackedPhase>,
}

#[derive(Default)]
pub struct MemoryWorkflowStore {
    entities: Mutex<HashMap<(WorkflowKind, DbId), MemoryEntity>>,
    primary_phases: Mutex<HashMap<DbId, PhaseRef>>,
    fee_phases: Mutex<HashMap<DbId, PhaseRef>>,
}

impl MemoryWorkflowStore {
    pub fn add_entity(&self, kind: WorkflowKind, id: DbId, description: &str) {
        self.entities.lock().unwrap().insert(
            (kind, id),
            MemoryEntity {
                description: description.to_string(),
                slots: HashMap::new(),
            },
        );
    }

    pub fn add_phase(&self, id: DbId, category: PhaseCategory, active: bool) {
        self.primary_phases.lock().unwrap().insert(
            id,
            PhaseRef {
                id,
                category: Some(category),
                active,
            },
        );
    }

    pub fn add_fee_phase(&self, id: DbId, active: bool) {
        self.fee_phases.lock().unwrap().insert(
            id,
            PhaseRef {
                id,
                category: None,
                active,
            },
        );
    }

    pub fn entity(&self, kind: WorkflowKind, id: DbId) -> MemoryEntity {
        self.entities.lock().unwrap()[&(kind, id)].clone()
    }

    pub fn slot(&self, target: PhaseTarget) -> TrackedPhase {
        self.entity(target.slot.kind(), target.entity_id)
            .slots
            .get(&target.slot)
            .cloned()
            .unwrap_or_default()
    }

    /// An ordinary save that touches only the unrelated field.
    pub fn update_description(&self, kind: WorkflowKind, id: DbId, description: &str) {
        let mut entities = self.entities.lock().unwrap();
        if let Some(entity) = entities.get_mut(&(kind, id)) {
            entity.description = description.to_string();
        }
    }
}

#[async_trait]
impl WorkflowEntityStore for MemoryWorkflowStore {
    async fn find_phase(&self, slot: PhaseSlot, phase_id: DbId) -> Result<Option<PhaseRef>, CoreError> {
        let catalog = match slot.catalog() {
            PhaseCatalog::Primary => &self.primary_phases,
            PhaseCatalog::Fee => &self.fee_phases,
        };
        Ok(catalog.lock().unwrap().get(&phase_id).copied())
    }

    async fn update_phase(
        &self,
        target: PhaseTarget,
        new_phase: Option<DbId>,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<PhaseUpdate>, CoreError> {
        let mut entities = self.entities.lock().unwrap();
        let Some(entity) = entities.get_mut(&(target.slot.kind(), target.entity_id)) else {
            return Ok(None);
        };
        let tracked = entity.slots.entry(target.slot).or_default();
        let previous_phase_id = tracked.phase_id;
        tracked.apply(new_phase, actor, at);
        Ok(Some(PhaseUpdate {
            previous_phase_id,
            current: tracked.clone(),
        }))
    }
}
