//! Binary entrypoint: run a batch of generation requests locally.
//!
//! Usage: `copyflow <requests.json> [config.yaml]`
//!
//! Requests are a JSON array of `GenerationRequest` objects. Config defaults
//! can be overridden with `COPYFLOW_*` environment variables.
mod mock;

use anyhow::{bail, Context, Result};
use copyflow_core::{GenerationRequest, WorkflowConfig, COPYFLOW_VERSION};
use copyflow_workflow::BatchCoordinator;
use mock::TemplateGenerator;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(requests_path) = args.next() else {
        bail!("usage: copyflow <requests.json> [config.yaml]");
    };

    let base = match args.next() {
        Some(path) => {
            let yaml = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            WorkflowConfig::from_yaml_str(&yaml)?
        }
        None => WorkflowConfig::default(),
    };
    let config = base.with_overrides(|key| std::env::var(key).ok())?;

    let raw = std::fs::read_to_string(&requests_path)
        .with_context(|| format!("reading requests {}", requests_path))?;
    let requests = GenerationRequest::list_from_json(&raw)
        .context("requests must be a JSON array of generation requests")?;

    tracing::info!(
        version = COPYFLOW_VERSION,
        requests = requests.len(),
        max_attempts = config.max_attempts,
        chunk_size = config.chunk_size,
        "starting batch"
    );

    let generator = Arc::new(TemplateGenerator::new(Duration::from_millis(250)));
    let coordinator = BatchCoordinator::new(generator).with_config(config)?;
    let result = coordinator.process_batch(requests).await;

    let report = json!({
        "successful": result.successful,
        "failed": result.failed,
        "metrics": result.metrics(),
        "results": result.results,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
