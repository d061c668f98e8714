//! Shared test utilities.
//!
//! This module provides an in-memory database with the full schema and helpers for
//! creating rows with sensible defaults.

use crate::{
    config::{
        AppConfig,
        app::{Environment, LogLevel},
    },
    core::{guilds, users},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// A syntactically valid user id.
pub const TEST_USER_ID: &str = "100000000000000001";
/// A syntactically valid guild id.
pub const TEST_GUILD_ID: &str = "300000000000000001";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all persistence tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a user with discriminator `0`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    id: &str,
    username: &str,
) -> Result<entities::user::Model> {
    users::create_or_update_user(db, id, username, "0").await
}

/// Creates a guild with empty settings.
pub async fn create_test_guild(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
) -> Result<entities::guild::Model> {
    guilds::create_or_update_guild(db, id, name, None).await
}

/// Configuration as the bot would see it in a test environment.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        discord_token: "test-token".to_string(),
        client_id: 200_000_000_000_000_001,
        guild_id: None,
        database_path: ":memory:".to_string(),
        log_level: LogLevel::Debug,
        enable_file_logging: false,
        environment: Environment::Test,
        default_prefix: crate::config::app::DEFAULT_PREFIX.to_string(),
    }
}
