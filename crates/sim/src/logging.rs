//! Tracing setup.
//!
//! Structured logs go to stderr so stdout stays clean for previews and JSON.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::dirs;

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. With `to_file`,
/// logs are mirrored into `<cache>/stonefall/logs/sim.log`; keep the returned
/// guard alive until exit so buffered lines are flushed.
pub fn init(to_file: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if !to_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_dir = dirs::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/sim.log", log_dir.display());
    Ok(Some(guard))
}
