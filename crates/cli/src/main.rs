use crate::error::CliError;
use clap::Parser;
use connectors::engine::local::LocalEngine;
use engine_core::{config::PipelineConfig, metrics::SysinfoSampler};
use engine_processing::report::chart::PlottersRenderer;
use engine_runtime::execution::executor;
use std::sync::Arc;
use tracing::{Level, info, warn};

mod error;

#[derive(Parser)]
#[command(
    name = "retail-analysis",
    version = "0.1.0",
    about = "Batch analytics over online retail transactions"
)]
struct Cli {
    /// Cache the loaded and cleaned tables and persist the monthly aggregate
    #[arg(short, long)]
    optimized: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env(cli.optimized)?;

    info!(
        "Starting {} (optimized: {}) on '{}'",
        config.app_name,
        config.optimized,
        config.data_path.display()
    );

    // The pipeline is synchronous; keep it off the async worker threads.
    let report = tokio::task::spawn_blocking(move || {
        let engine = LocalEngine::new();
        let renderer = PlottersRenderer::new(config.output_dir.clone());
        let sampler = Arc::new(SysinfoSampler::new());
        executor::run(&config, &engine, &renderer, sampler)
    })
    .await?;

    // Stage errors were already logged by the executor and do not change the exit code.
    if let Some(err) = &report.error {
        warn!("Run ended early ({} error in '{}')", err.kind(), err.stage());
    }
    for artifact in &report.artifacts {
        info!("Artifact: {}", artifact.display());
    }

    Ok(())
}
