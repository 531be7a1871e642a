use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use parkstat_core::Config;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "parkstat.log";

/// Sends tracing output to `parkstat.log` in the reports directory; the
/// terminal belongs to the UI. `RUST_LOG` takes precedence over the config.
pub fn init(config: &Config) -> Result<()> {
    let path = config.reports_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level `{}`", config.log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
