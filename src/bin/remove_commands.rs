//! Removes every slash command the bot registered.
//!
//! Global commands are always cleared; the development guild's commands are cleared
//! too when `GUILD_ID` is set.

use guildkeeper::{
    bot::deploy::{self, Scope},
    config::{AppConfig, app::LogLevel},
    errors::Result,
    logging,
};
use poise::serenity_prelude::{ApplicationId, Http};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();
    let level = config.as_ref().map_or(LogLevel::Info, |c| c.log_level);
    let _log_guards = logging::init(level, false)?;
    let config = config.inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    config.log_summary();

    let http = Http::new(&config.discord_token);
    http.set_application_id(ApplicationId::new(config.client_id));

    deploy::remove(&http, Scope::Global)
        .await
        .inspect_err(|e| error!("Error removing global commands: {}", e))?;
    if let Scope::Guild(guild_id) = Scope::from_config(config.guild_id) {
        deploy::remove(&http, Scope::Guild(guild_id))
            .await
            .inspect_err(|e| error!("Error removing guild commands: {}", e))?;
    }

    info!("All commands removed");
    Ok(())
}
