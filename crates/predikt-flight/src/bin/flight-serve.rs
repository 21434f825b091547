use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use predikt_flight::{router, FlightConfig, FlightContext};

/// Serve flight price predictions over HTTP.
#[derive(Debug, Parser)]
#[command(name = "flight-serve", version)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pipeline artifact; overrides the container and executable-relative paths
    #[arg(short, long)]
    model: Option<PathBuf>,

    #[arg(long)]
    host: Option<IpAddr>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = FlightConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.model.is_some() {
        cfg.model_path = cli.model;
    }
    if let Some(host) = cli.host {
        cfg.host = host;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    predikt_serve::init_tracing(&cfg.log_level, cfg.log_json || cli.json_logs);

    let path = cfg.serving_path();
    let ctx = FlightContext::load(&path).with_context(|| format!("loading model from {}", path.display()))?;
    predikt_serve::serve(router(Arc::new(ctx)), cfg.bind_addr()).await?;
    Ok(())
}
