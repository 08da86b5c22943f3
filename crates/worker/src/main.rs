use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use precatorios_core::clock::{Clock, SystemClock};
use precatorios_worker::{render, run, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "precatorios_worker=info,precatorios_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let pool = precatorios_db::create_pool(&args.database_url)
        .await
        .context("Failed to connect to database")?;

    let report = run(&pool, &args, SystemClock.today()).await?;
    println!("{}", render(&report, args.json)?);

    pool.close().await;

    if report.has_failures() {
        tracing::error!("Priority update finished with failures");
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!(
        promoted = report.promoted(),
        demoted = report.demoted(),
        dry_run = report.dry_run,
        "Priority update finished"
    );
    Ok(ExitCode::SUCCESS)
}
