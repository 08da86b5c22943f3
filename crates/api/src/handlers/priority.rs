//! Handler for on-demand priority reconciliation.

use axum::extract::State;
use axum::Json;
use precatorios_core::priority::ReconciliationReport;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /priority/reconcile`. Both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ReconcileParams {
    #[serde(default)]
    pub dry_run: bool,
    /// Overrides the configured age threshold.
    pub age_threshold_years: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    #[serde(flatten)]
    pub report: ReconciliationReport,
    pub promoted: u64,
    pub demoted: u64,
    /// Human-readable rendering of the report.
    pub summary: String,
}

/// POST /api/v1/priority/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
    Json(params): Json<ReconcileParams>,
) -> AppResult<Json<DataResponse<ReconcileResponse>>> {
    let threshold = params
        .age_threshold_years
        .unwrap_or(state.config.priority_age_threshold_years);

    let report = state
        .reconciler()
        .reconcile(state.clock.today(), threshold, params.dry_run)
        .await?;

    if report.has_failures() {
        tracing::error!(
            promoted = report.promoted(),
            demoted = report.demoted(),
            "Priority reconciliation finished with failures"
        );
    } else {
        tracing::info!(
            promoted = report.promoted(),
            demoted = report.demoted(),
            dry_run = report.dry_run,
            "Priority reconciliation finished"
        );
    }

    Ok(Json(DataResponse {
        data: ReconcileResponse {
            promoted: report.promoted(),
            demoted: report.demoted(),
            summary: report.to_string(),
            report,
        },
    }))
}
