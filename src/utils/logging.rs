//! File logging. The terminal belongs to the UI, so events go to
//! ~/.polyrolly/polyrolly.log instead.

use super::persistence::app_dir;
use crate::core::constants::LOG_FILE_NAME;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "polyrolly=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init() -> io::Result<WorkerGuard> {
    let appender = rolling::never(app_dir()?, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(guard)
}
