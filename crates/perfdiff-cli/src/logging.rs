use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Logs go to stderr; stdout carries results.
///
/// With `log_file`, every event is also appended to that file. If the file
/// cannot be opened, logging falls back to stderr only and the error is
/// reported once the subscriber is up.
pub fn init(log_file: Option<&Path>) {
    let Some(path) = log_file else {
        fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).init();
        return;
    };

    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        Err(e) => {
            fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).init();
            tracing::warn!("Cannot open log file {}: {e}", path.display());
        }
    }
}
