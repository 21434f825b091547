use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use predikt_scheduler::{run_forever, spawn_job, SchedulerConfig};

/// Rerun the flight trainer on a schedule.
#[derive(Debug, Parser)]
#[command(name = "predikt-scheduler", version)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fire the job once now and exit without waiting for it
    #[arg(long)]
    once: bool,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = SchedulerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    predikt_serve::init_tracing(&cfg.log_level, cfg.log_json || cli.json_logs);
    tracing::info!(job = %cfg.job.id, schedule = %cfg.job.schedule, "scheduler starting");

    if cli.once {
        let pid = spawn_job(&cfg.job)?;
        tracing::info!(pid, "manual trigger");
        return Ok(());
    }

    tokio::select! {
        _ = run_forever(cfg.job) => {},
        _ = tokio::signal::ctrl_c() => tracing::info!("scheduler stopped"),
    }
    Ok(())
}
