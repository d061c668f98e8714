//! Application configuration loaded from environment variables.
//!
//! Every variable is read and checked up front. Violations are collected rather than
//! reported one at a time, so a misconfigured deployment sees the full list in a
//! single startup failure.

use crate::{
    core::validation,
    errors::{Error, Result},
};
use std::fmt;
use tracing::info;

/// Fallback for `DATABASE_PATH`.
pub const DEFAULT_DATABASE_PATH: &str = "./data/bot.db";
/// Fallback for `DEFAULT_PREFIX` and the prefix stored on new guild rows.
pub const DEFAULT_PREFIX: &str = "!";

/// Verbosity accepted by `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Normal operation
    Info,
    /// Everything
    Debug,
}

impl LogLevel {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Deployment environment named by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development (default)
    Development,
    /// Live deployment
    Production,
    /// Test runs
    Test,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        })
    }
}

/// Validated, read-only configuration. Built once in `main` and shared by reference.
#[derive(Clone)]
pub struct AppConfig {
    /// Bot token (`DISCORD_TOKEN`)
    pub discord_token: String,
    /// Application id (`CLIENT_ID`)
    pub client_id: u64,
    /// Development guild for fast command deployment (`GUILD_ID`)
    pub guild_id: Option<u64>,
    /// `SQLite` file (`DATABASE_PATH`)
    pub database_path: String,
    /// `LOG_LEVEL`
    pub log_level: LogLevel,
    /// `ENABLE_FILE_LOGGING`, forced on in production
    pub enable_file_logging: bool,
    /// `APP_ENV`
    pub environment: Environment,
    /// `DEFAULT_PREFIX`
    pub default_prefix: String,
}

// The token never reaches the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("discord_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("database_path", &self.database_path)
            .field("log_level", &self.log_level)
            .field("enable_file_logging", &self.enable_file_logging)
            .field("environment", &self.environment)
            .field("default_prefix", &self.default_prefix)
            .finish()
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut violations = Vec::new();

        let discord_token = read("DISCORD_TOKEN").unwrap_or_default();
        if discord_token.is_empty() {
            violations.push("DISCORD_TOKEN is required".to_string());
        } else if !validation::is_valid_discord_token(&discord_token) {
            violations.push("DISCORD_TOKEN is not a valid bot token".to_string());
        }

        let client_id = match read("CLIENT_ID") {
            None => {
                violations.push("CLIENT_ID is required".to_string());
                0
            }
            Some(raw) => parse_snowflake("CLIENT_ID", &raw, &mut violations),
        };

        let guild_id = read("GUILD_ID").map(|raw| parse_snowflake("GUILD_ID", &raw, &mut violations));

        let database_path =
            read("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let log_level = match read("LOG_LEVEL") {
            None => LogLevel::Info,
            Some(raw) => LogLevel::parse(&raw).unwrap_or_else(|| {
                violations.push("LOG_LEVEL must be one of: error, warn, info, debug".to_string());
                LogLevel::Info
            }),
        };

        let environment = match read("APP_ENV") {
            None => Environment::Development,
            Some(raw) => Environment::parse(&raw).unwrap_or_else(|| {
                violations
                    .push("APP_ENV must be one of: development, production, test".to_string());
                Environment::Development
            }),
        };

        let enable_file_logging = read("ENABLE_FILE_LOGGING").as_deref() == Some("true")
            || environment == Environment::Production;

        let default_prefix = read("DEFAULT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if !validation::is_valid_prefix(&default_prefix) {
            violations.push(
                "DEFAULT_PREFIX must be 1-5 characters without whitespace".to_string(),
            );
        }

        if !violations.is_empty() {
            let message = format!(
                "Configuration validation failed:\n{}",
                violations
                    .iter()
                    .map(|violation| format!("  - {violation}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
            return Err(Error::Config { message });
        }

        Ok(Self {
            discord_token,
            client_id,
            guild_id,
            database_path,
            log_level,
            enable_file_logging,
            environment,
            default_prefix,
        })
    }

    /// Logs the validated settings. Call once logging is initialized.
    pub fn log_summary(&self) {
        info!(
            environment = %self.environment,
            log_level = self.log_level.as_directive(),
            database_path = %self.database_path,
            enable_file_logging = self.enable_file_logging,
            "Configuration validated successfully"
        );
    }

    /// `APP_ENV=development`
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// `APP_ENV=production`
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// `APP_ENV=test`
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }
}

fn parse_snowflake(key: &str, raw: &str, violations: &mut Vec<String>) -> u64 {
    if !validation::is_valid_snowflake(raw) {
        violations.push(format!("{key} must be a 17-19 digit Discord id"));
        return 0;
    }
    raw.parse().unwrap_or_else(|_| {
        violations.push(format!("{key} is out of range"));
        0
    })
}
