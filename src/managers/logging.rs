//! Logging manager with file rotation
//!
//! Dual-output logging: a concise console layer on stderr at INFO, and
//! a daily-rotated file layer at the configured level. Old log files
//! past the retention count are removed on startup.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{expand_tilde, GlobalConfig};

/// Log file name prefix; rotated files carry a date suffix
const LOG_FILE_PREFIX: &str = "fleet-backup.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Log level for file output (console always uses INFO)
    pub log_level: Level,
    /// Maximum number of log files to keep
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_directory: dirs::home_dir()
                .map(|home| home.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
            log_level: Level::DEBUG,
            max_files: 10,
        }
    }
}

impl LoggingConfig {
    /// Create from global config values
    pub fn from_config(global: &GlobalConfig) -> Self {
        Self {
            log_directory: global.log_directory.clone(),
            log_level: parse_level(&global.log_level),
            max_files: global.log_max_files,
        }
    }
}

/// Parse a level name from the config file; unknown names mean INFO
fn parse_level(name: &str) -> Level {
    if name.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    name.parse().unwrap_or(Level::INFO)
}

/// Initialize logging with console and file outputs
///
/// Returns a guard that must be kept alive for the duration of the program.
/// When the guard is dropped, any remaining logs are flushed to disk.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard> {
    let log_dir = expand_tilde(&config.log_directory);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter(config.log_level));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(env_filter(Level::INFO));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    cleanup_old_logs(&log_dir, config.max_files)?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Initialize simple console-only logging (for when config isn't available)
pub fn init_console_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Level filter for one layer. RUST_LOG overrides the configured level.
fn env_filter(level: Level) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut filter = EnvFilter::default().add_directive(level.into());
    if let Ok(directive) = format!("fleet_backup={}", level).parse() {
        filter = filter.add_directive(directive);
    }
    filter
}

/// Remove log files beyond the newest `max_files`
fn cleanup_old_logs(log_dir: &Path, max_files: u32) -> Result<()> {
    let mut dated: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(log_dir)?.flatten() {
        if !entry
            .file_name()
            .to_string_lossy()
            .starts_with(LOG_FILE_PREFIX)
        {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        dated.push((modified, entry.path()));
    }

    if dated.len() <= max_files as usize {
        return Ok(());
    }

    // Newest first; everything past the limit goes
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in dated.split_off(max_files as usize) {
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Removed old log file: {:?}", path),
            Err(e) => tracing::warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }

    Ok(())
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any remaining logs to disk.
pub struct LogGuard {
    _file_guard: WorkerGuard,
}
