//! Logging setup and the semantic logging helpers used across the bot.
//!
//! Console output always goes through `tracing_subscriber::fmt`. With file logging
//! enabled two daily-rolling files are written as well: `combined.log` with everything
//! the filter lets through and `error.log` with errors only.
//!
//! The helpers below tag every event with a `category` field so the files can be
//! grepped by concern (`category=security`, `category=command`, ...).

use crate::{
    config::app::LogLevel,
    errors::{Error, Result},
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directory the log files are written to.
pub const LOG_DIR: &str = "logs";

/// Keeps the background file writers alive. Dropping it flushes and stops them.
#[must_use = "file logging stops when the guards are dropped"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

fn env_filter(level: LogLevel) -> EnvFilter {
    // RUST_LOG wins over LOG_LEVEL
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Installs the global subscriber. Call once, as early as possible.
pub fn init(level: LogLevel, file_logging: bool) -> Result<LogGuards> {
    init_in(level, file_logging, Path::new(LOG_DIR))
}

/// [`init`] with an explicit log directory.
pub fn init_in(level: LogLevel, file_logging: bool, log_dir: &Path) -> Result<LogGuards> {
    let console = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(env_filter(level));

    let mut guards = Vec::new();
    let (combined, errors) = if file_logging {
        std::fs::create_dir_all(log_dir)?;

        let (combined_writer, combined_guard) =
            tracing_appender::non_blocking(rolling::daily(log_dir, "combined.log"));
        let (error_writer, error_guard) =
            tracing_appender::non_blocking(rolling::daily(log_dir, "error.log"));
        guards.push(combined_guard);
        guards.push(error_guard);

        (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(combined_writer)
                    .with_filter(env_filter(level)),
            ),
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(error_writer)
                    .with_filter(LevelFilter::ERROR),
            ),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(combined)
        .with(errors)
        .try_init()
        .map_err(|e| Error::Config {
            message: format!("Failed to initialize logging: {e}"),
        })?;

    if file_logging {
        info!(directory = %log_dir.display(), "File logging enabled");
    }
    Ok(LogGuards { _guards: guards })
}

/// A slash command is about to run.
pub fn command(name: &str, user_id: &str, guild_id: Option<&str>) {
    info!(
        category = "command",
        command = name,
        user_id,
        guild_id = guild_id.unwrap_or("DM"),
        "Command executed"
    );
}

/// A gateway event worth recording, with free-form details.
pub fn event(name: &str, details: &Value) {
    info!(category = "event", event = name, %details, "Event received");
}

/// A database write.
pub fn database(operation: &str, table: &str, id: &str) {
    debug!(category = "database", operation, table, id, "Database operation");
}

/// A moderation action or other privileged operation.
pub fn security(action: &str, actor_id: &str, details: &Value) {
    warn!(category = "security", action, actor_id, %details, "Security event");
}

/// Startup milestones.
pub fn startup(message: &str) {
    info!(category = "startup", "{message}");
}

/// Shutdown milestones.
pub fn shutdown(message: &str) {
    info!(category = "shutdown", "{message}");
}
