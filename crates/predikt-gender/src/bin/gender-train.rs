use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use predikt_gender::{trainer, GenderConfig};

/// Train the gender classifier and write its artifact directory.
#[derive(Debug, Parser)]
#[command(name = "gender-train", version)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// users.csv
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Directory for the fitted artifacts
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Skip the local experiment store
    #[arg(long)]
    no_tracking: bool,

    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = GenderConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data) = cli.data {
        cfg.data_path = data;
    }
    if let Some(dir) = cli.artifacts {
        cfg.artifact_dir = dir;
    }
    if cli.no_tracking {
        cfg.tracking.enabled = false;
    }
    predikt_serve::init_tracing(&cfg.log_level, cfg.log_json || cli.json_logs);

    let outcome = trainer::run(&cfg)?;
    tracing::info!(
        accuracy = outcome.accuracy,
        dir = %cfg.artifact_dir.display(),
        "artifacts saved"
    );
    Ok(())
}
