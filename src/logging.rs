//! Tracing configuration and log routing.
//!
//! Logs go to stdout through a compact formatter and, in parallel, to a file. The file comes from
//! `Config::log_file` (`STUDYGEN_LOG_FILE`); without it the service appends to
//! `logs/studygen.log`. The file layer uses a non-blocking writer whose guard lives for the rest
//! of the process.
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "studygen.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and file logging.
///
/// `RUST_LOG` controls filtering and defaults to `info`. Load configuration (and `.env`) first so
/// both the filter and `log_file` reflect it.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    if let Some(writer) = configure_file_writer(log_file) {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).init();
    } else {
        registry.init();
    }
}

/// Returns `None` when the log file cannot be opened; stdout logging still works in that case.
fn configure_file_writer(log_file: Option<&Path>) -> Option<NonBlocking> {
    match log_file {
        Some(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            Ok(file) => Some(install_writer(file)),
            Err(err) => {
                eprintln!("Failed to open log file {}: {err}", path.display());
                None
            }
        },
        None => {
            if let Err(err) = std::fs::create_dir_all(DEFAULT_LOG_DIR) {
                eprintln!("Failed to create {DEFAULT_LOG_DIR} directory: {err}");
                return None;
            }
            let file_appender =
                tracing_appender::rolling::never(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE);
            Some(install_writer(file_appender))
        }
    }
}

fn install_writer<W>(writer: W) -> NonBlocking
where
    W: std::io::Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    let _ = LOG_GUARD.set(guard);
    non_blocking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_log_file_is_created() {
        let path = std::env::temp_dir().join(format!("studygen-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        assert!(configure_file_writer(Some(&path)).is_some());
        assert!(path.exists(), "log file should be created at the configured path");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unopenable_log_file_disables_file_layer() {
        let path = std::env::temp_dir()
            .join(format!("studygen-missing-{}", std::process::id()))
            .join("nested")
            .join("app.log");

        assert!(configure_file_writer(Some(&path)).is_none());
    }
}
