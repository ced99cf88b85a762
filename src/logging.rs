//! Logging setup.
//!
//! `serve` logs to `<state>/logs/manager-assistant-{datetime}.log` when file
//! logging is enabled; one-shot CLI commands log to stderr.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the file writer alive; drop flushes buffered lines
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,
    pub log_file_path: Option<PathBuf>,
}

/// Where log output should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

impl LogTarget {
    /// Long-running server mode honours `logging.to_file`; everything else uses stderr
    pub fn for_mode(config: &Config, server_mode: bool) -> Self {
        if server_mode && config.logging.to_file {
            LogTarget::File
        } else {
            LogTarget::Stderr
        }
    }
}

fn level_directive(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

fn log_file_name(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    format!("manager-assistant-{}.log", timestamp.format("%Y%m%dT%H%M%SZ"))
}

/// Install the global subscriber. `RUST_LOG` takes precedence over config.
pub fn init_logging(config: &Config, server_mode: bool, debug_override: bool) -> Result<LoggingHandle> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(config, debug_override)));

    match LogTarget::for_mode(config, server_mode) {
        LogTarget::File => {
            let logs_dir = config.logs_path();
            std::fs::create_dir_all(&logs_dir)?;

            let log_filename = log_file_name(chrono::Utc::now());
            let log_file_path = logs_dir.join(&log_filename);

            let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();

            Ok(LoggingHandle {
                _guard: Some(guard),
                log_file_path: Some(log_file_path),
            })
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();

            Ok(LoggingHandle {
                _guard: None,
                log_file_path: None,
            })
        }
    }
}
