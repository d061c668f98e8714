//! Configuration - environment settings, database connection and schema migrations.

/// Environment-driven application settings
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Ordered schema migration steps and the strict runner
pub mod migrations;

pub use app::AppConfig;
