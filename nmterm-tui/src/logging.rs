/*!
 * Debug log setup
 * File-only tracing subscriber; the terminal belongs to the display, so
 * nothing is logged unless debug mode is on. `NMTERM_LOG` overrides the filter
 */

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NMTERM_LOG";
const DEFAULT_FILTER: &str = "nmterm=debug,nmterm_core=debug";

/// Install the global subscriber writing to `path`.
///
/// The returned guard flushes pending lines when dropped; keep it alive until
/// the terminal is restored.
pub fn init_file_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .context("debug log path has no parent directory")?;
    let file_name = path
        .file_name()
        .context("debug log path has no file name")?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {}", e))?;

    Ok(guard)
}
