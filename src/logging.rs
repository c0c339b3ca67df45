use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::infra::config::paths;

pub const LOG_ENV: &str = "ASKQL_LOG";
const DEFAULT_FILTER: &str = "askql=info";

/// Where log lines go. The TUI owns the terminal, so it logs to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter());

    match target {
        LogTarget::File => {
            let path = paths::log_dir()?.join(paths::LOG_FILE_NAME);
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| color_eyre::eyre::eyre!(e))?;
        }
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| color_eyre::eyre::eyre!(e))?;
        }
    }
    Ok(())
}
