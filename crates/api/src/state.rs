use std::sync::Arc;

use precatorios_core::clock::Clock;
use precatorios_core::phase_audit::PhaseAuditService;
use precatorios_core::priority::PriorityReconciler;
use precatorios_db::stores::{PgPersonStore, PgWorkflowStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: precatorios_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of "now" for audit stamps, ages and deadlines.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn phase_audit(&self) -> PhaseAuditService<PgWorkflowStore, Arc<dyn Clock>> {
        PhaseAuditService::new(PgWorkflowStore::new(self.pool.clone()), Arc::clone(&self.clock))
    }

    pub fn reconciler(&self) -> PriorityReconciler<PgPersonStore> {
        PriorityReconciler::new(PgPersonStore::new(self.pool.clone()))
    }
}
