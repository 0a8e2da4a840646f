use anyhow::{Context, Result};
use clap::Parser;
use newsetl::orchestrate::{Orchestrator, PipelineConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Run extract, transform and load for every configured news source.
#[derive(Parser, Debug)]
struct Args {
    /// YAML pipeline config; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    info!(sources = ?config.sources, "pipeline configured");

    let orchestrator = Orchestrator::new(config).context("resolving resources dir")?;
    info!(resources = %orchestrator.resources().display(), "stages will use resources");
    orchestrator.run().context("pipeline aborted")?;
    Ok(())
}
