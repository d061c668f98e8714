use guildkeeper::{
    bot,
    config::{AppConfig, app::LogLevel, database},
    errors::Result,
    logging,
};
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file (non-fatal, variables can be set externally)
    dotenvy::dotenv().ok();

    // 2. Read configuration, then start logging at the configured level
    let config = AppConfig::from_env();
    let (level, file_logging) = config
        .as_ref()
        .map_or((LogLevel::Info, false), |c| (c.log_level, c.enable_file_logging));
    let _log_guards = logging::init(level, file_logging)?;
    let config = Arc::new(config.inspect_err(|e| error!("Failed to load configuration: {}", e))?);
    config.log_summary();

    // 3. Open the database and bootstrap the schema
    let db = database::initialize(&config.database_path)
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 4. Run the bot until it stops or a shutdown signal arrives
    let result = bot::run_bot(Arc::clone(&config), db.clone()).await;

    logging::shutdown("Closing database connection...");
    if let Err(e) = database::close(db).await {
        error!("Error closing database: {}", e);
    }
    logging::shutdown("Shutdown complete");

    result
}
