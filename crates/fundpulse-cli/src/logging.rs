//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,fundpulse=debug";

/// Install the global subscriber.
///
/// Log lines are appended to the configured log file. With `console_output`
/// they are also written to stderr, unless `quiet` is set.
pub fn init(config: &AppConfig, quiet: bool) -> CliResult<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into()));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(file));

    let console_layer = (config.console_output && !quiet)
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
