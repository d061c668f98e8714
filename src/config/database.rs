//! Database configuration - `SQLite` connection setup and the bootstrap schema path.
//!
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust models. The bootstrap path used by the bot skips
//! tables that already exist; the `migrate` binary goes through the strict runner in
//! [`crate::config::migrations`] instead.

use crate::{
    config::migrations::{self, Mode},
    errors::Result,
    logging,
};
use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use tracing::{info, instrument};

/// Connection URL for a database file. `:memory:` maps to an in-memory database.
#[must_use]
pub fn database_url(path: &str) -> String {
    if path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{path}?mode=rwc")
    }
}

/// Opens the database file, creating it and its parent directory when missing.
#[instrument]
pub async fn create_connection(path: &str) -> Result<DatabaseConnection> {
    if path != ":memory:" {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let db = Database::connect(database_url(path)).await?;
    info!(path, "Connected to database");
    Ok(db)
}

/// Creates every table that does not exist yet and records the migration steps as applied.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    migrations::ensure_bookkeeping(db).await?;
    for migration in migrations::MIGRATIONS {
        migrations::execute(db, &migration, Mode::Bootstrap).await?;
        migrations::record(db, &migration).await?;
    }
    logging::database("bootstrap", "*", "schema");
    Ok(())
}

/// Connects and runs the bootstrap schema path. Used by the bot at startup.
pub async fn initialize(path: &str) -> Result<DatabaseConnection> {
    let db = create_connection(path).await?;
    create_tables(&db).await?;
    info!("Database initialized");
    Ok(db)
}

/// Closes the pool. Called once during shutdown.
pub async fn close(db: DatabaseConnection) -> Result<()> {
    db.close().await?;
    info!("Database connection closed");
    Ok(())
}
