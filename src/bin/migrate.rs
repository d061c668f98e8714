//! Applies pending schema migrations in order.
//!
//! Unlike the bot's startup bootstrap this runner does not tolerate tables that exist
//! without a matching migration record.

use guildkeeper::{
    config::{AppConfig, app::LogLevel, database, migrations},
    errors::Result,
    logging,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();
    let level = config.as_ref().map_or(LogLevel::Info, |c| c.log_level);
    let _log_guards = logging::init(level, false)?;
    let config = config.inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    config.log_summary();

    let db = database::create_connection(&config.database_path).await?;
    let result = migrations::run_migrations(&db).await;
    database::close(db).await?;

    let applied = result.inspect_err(|e| error!("Migration failed: {}", e))?;
    info!(?applied, "Migration run finished");
    Ok(())
}
