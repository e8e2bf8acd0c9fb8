//! Structured logging setup.
//!
//! Wraps `tracing` to provide a console logger plus an optional rolling
//! NDJSON file, with level control via `RUST_LOG` falling back to the
//! configured level.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global logger with console output only.
pub fn init(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// Initialize the global logger with console output and a daily-rotated
/// NDJSON file under `log_dir`.
pub fn init_with_file<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "bidforge.log");

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logger_writes_daily_rotated_log() {
        let log_dir = std::env::temp_dir().join(format!(
            "bidforge-log-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&log_dir).unwrap();

        init_with_file(&log_dir, "info");
        tracing::info!(component = "logging", "file logger smoke test");

        let has_log_file = std::fs::read_dir(&log_dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("bidforge.log")
            });
        assert!(has_log_file, "expected a bidforge.log file in {log_dir:?}");

        let _ = std::fs::remove_dir_all(&log_dir);
    }
}
