//! # Curriculum Runtime
//!
//! Entry point: initialize logging, open the data directory, recover
//! unfinished operations, then sweep the journal until Ctrl+C.

use anyhow::Result;
use curriculum_runtime::{CurriculumRuntime, RuntimeConfig};
use curriculum_telemetry::{init_logging, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env())?;

    let config = RuntimeConfig::from_env();
    let runtime = CurriculumRuntime::open(config)?;
    runtime.recover().await?;

    let sweeper = runtime.start_sweeper();
    info!(
        interval_secs = runtime.config().reconcile_interval.as_secs(),
        "Runtime is running. Press Ctrl+C to stop."
    );
    tokio::signal::ctrl_c().await?;

    runtime.shutdown(sweeper).await;
    Ok(())
}
