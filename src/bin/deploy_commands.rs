//! Registers the bot's slash commands with Discord.
//!
//! Commands go to the development guild when `GUILD_ID` is set and globally otherwise.

use guildkeeper::{
    bot::{
        commands,
        deploy::{self, Scope},
    },
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

    let scope = Scope::from_config(config.guild_id);
    let descriptors = commands::all();
    let count = deploy::deploy(&http, &descriptors, scope)
        .await
        .inspect_err(|e| error!("Error deploying commands: {}", e))?;

    info!(count, ?scope, "Commands deployed");
    Ok(())
}
