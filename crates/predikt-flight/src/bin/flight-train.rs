use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use predikt_flight::{trainer, FlightConfig};

/// Train the flight price candidates and save the selected pipeline.
#[derive(Debug, Parser)]
#[command(name = "flight-train", version)]
struct Cli {
    /// Config file (defaults to ./predikt.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flights CSV
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Where to write the fitted pipeline
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Write a JSON training report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = FlightConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data) = cli.data {
        cfg.data_path = data;
    }
    if cli.model.is_some() {
        cfg.model_path = cli.model;
    }
    if cli.report.is_some() {
        cfg.report_path = cli.report;
    }
    predikt_serve::init_tracing(&cfg.log_level, cfg.log_json || cli.json_logs);

    let report = trainer::run(&cfg)?;
    tracing::info!(
        model = %report.selected,
        path = %cfg.output_path().display(),
        "Model saved"
    );
    Ok(())
}
