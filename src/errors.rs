//! Unified error types for the bot, the persistence layer and the bootstrap binaries.

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Every failure the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration. Startup-fatal.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description, one violation per line
        message: String,
    },

    /// Database failure reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Failure reported by the Discord client library
    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),

    /// I/O error (directories for the database file and log files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings blob (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A user supplied value failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field or option
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A keyed lookup found nothing
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind (`guild`, `user`)
        entity: &'static str,
        /// The identifier that was looked up
        id: String,
    },

    /// Generic command execution failure
    #[error("Command execution error: {message}")]
    Command {
        /// Description of the failure
        message: String,
    },

    /// Timed out waiting for the gateway ready signal
    #[error("Timed out after {seconds}s waiting for the ready event")]
    ReadyTimeout {
        /// The timeout that elapsed
        seconds: u64,
    },
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
