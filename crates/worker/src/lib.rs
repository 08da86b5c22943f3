//! Batch priority reconciliation.
//!
//! Run periodically (e.g. from cron) to grant priority to persons who have
//! reached the age threshold and revoke it from deceased persons.

use anyhow::Context;
use clap::Parser;
use precatorios_core::eligibility::DEFAULT_AGE_THRESHOLD_YEARS;
use precatorios_core::priority::{PriorityReconciler, ReconciliationReport};
use precatorios_core::types::Date;
use precatorios_db::stores::PgPersonStore;
use precatorios_db::DbPool;

#[derive(Debug, Parser)]
#[command(name = "update-priority")]
#[command(version, about = "Update priority status of persons by age and deceased flag")]
pub struct Args {
    /// Show what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Age in years at which a living person gains priority.
    #[arg(
        long,
        env = "PRIORITY_AGE_THRESHOLD_YEARS",
        default_value_t = DEFAULT_AGE_THRESHOLD_YEARS,
        allow_negative_numbers = true
    )]
    pub age_limit: i32,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Reconcile priority flags as of `today`.
pub async fn run(pool: &DbPool, args: &Args, today: Date) -> anyhow::Result<ReconciliationReport> {
    let reconciler = PriorityReconciler::new(PgPersonStore::new(pool.clone()));
    let report = reconciler
        .reconcile(today, args.age_limit, args.dry_run)
        .await
        .context("Failed to load priority candidates")?;
    Ok(report)
}

/// Render `report` for stdout.
pub fn render(report: &ReconciliationReport, json: bool) -> anyhow::Result<String> {
    if json {
        serde_json::to_string_pretty(report).context("Failed to serialize report")
    } else {
        Ok(report.to_string())
    }
}
