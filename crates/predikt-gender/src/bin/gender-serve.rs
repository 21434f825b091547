use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use predikt_gender::{router, GenderConfig, GenderContext};

/// Serve gender predictions over HTTP.
#[derive(Debug, Parser)]
#[command(name = "gender-serve", version)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the fitted artifacts
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

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
    let mut cfg = GenderConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.artifacts {
        cfg.artifact_dir = dir;
    }
    if let Some(host) = cli.host {
        cfg.host = host;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    predikt_serve::init_tracing(&cfg.log_level, cfg.log_json || cli.json_logs);

    // the embedder may download weights; keep it off the async workers
    let load_cfg = cfg.clone();
    let ctx = tokio::task::spawn_blocking(move || GenderContext::load(&load_cfg))
        .await
        .context("loader task panicked")?
        .with_context(|| format!("loading artifacts from {}", cfg.artifact_dir.display()))?;
    predikt_serve::serve(router(Arc::new(ctx)), cfg.bind_addr()).await?;
    Ok(())
}
