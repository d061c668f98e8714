//! Bot layer - Discord-specific interface, command handling and client lifecycle
//!
//! This module wires the gateway client to the command registry and dispatcher,
//! holds the state shared by all commands, and runs the client until shutdown.

/// Command descriptors and the invocation context passed to actions
pub mod command;
/// Slash command implementations (general and moderation)
pub mod commands;
/// Publishing command schemas to Discord
pub mod deploy;
/// Command routing with per-invocation error isolation
pub mod dispatch;
/// Gateway event handler
pub mod events;
/// Name-keyed command registry
pub mod registry;
/// Interaction responses with reply tracking
pub mod responder;

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    logging,
};
use command::CommandDescriptor;
use poise::serenity_prelude::{self as serenity, ShardId, ShardManager};
use registry::CommandRegistry;
use sea_orm::DatabaseConnection;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::Notify;
use tracing::{debug, error, info, instrument, warn};

/// How long startup waits for the gateway ready event before warning.
pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared data available to all bot commands and event handlers.
///
/// Built once at startup and passed around by reference. The registry is never
/// mutated after construction.
pub struct BotData {
    /// Database connection for all persistence
    pub database: DatabaseConnection,
    /// Validated configuration
    pub config: Arc<AppConfig>,
    /// Every command the bot answers to
    pub registry: CommandRegistry<CommandDescriptor>,
    /// Process start, for uptime
    pub started_at: Instant,
    ready: AtomicBool,
    ready_signal: Notify,
    shard_manager: OnceLock<Arc<ShardManager>>,
}

impl BotData {
    /// Creates the shared state with the given commands.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        config: Arc<AppConfig>,
        registry: CommandRegistry<CommandDescriptor>,
    ) -> Self {
        Self {
            database,
            config,
            registry,
            started_at: Instant::now(),
            ready: AtomicBool::new(false),
            ready_signal: Notify::new(),
            shard_manager: OnceLock::new(),
        }
    }

    /// Records that the gateway reported ready and wakes every waiter.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
        self.ready_signal.notify_waiters();
    }

    /// Whether the ready event has been received.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Waits until the ready event arrives, failing after `timeout`.
    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let notified = self.ready_signal.notified();
        if self.is_ready() {
            return Ok(());
        }
        tokio::time::timeout(timeout, notified)
            .await
            .map_err(|_| Error::ReadyTimeout {
                seconds: timeout.as_secs(),
            })
    }

    /// Time since the bot started.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores the client's shard manager. Only the first call has an effect.
    pub fn set_shard_manager(&self, manager: Arc<ShardManager>) {
        if self.shard_manager.set(manager).is_err() {
            debug!("Shard manager already set");
        }
    }

    /// Last heartbeat latency measured on `shard`.
    pub async fn gateway_latency(&self, shard: ShardId) -> Option<Duration> {
        let manager = self.shard_manager.get()?;
        let runners = manager.runners.lock().await;
        runners.get(&shard).and_then(|runner| runner.latency)
    }
}

/// Gateway intents the bot needs: guild and member events, presences for the
/// `serverinfo` online count, message access for `clear`.
#[must_use]
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_PRESENCES
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Connects to Discord and runs until the client stops or a shutdown signal arrives.
#[instrument(skip_all)]
pub async fn run_bot(config: Arc<AppConfig>, database: DatabaseConnection) -> Result<()> {
    let registry: CommandRegistry<CommandDescriptor> = commands::all().into_iter().collect();
    info!(count = registry.len(), "Commands registered");

    let data = Arc::new(BotData::new(database, Arc::clone(&config), registry));

    logging::startup("Starting Discord bot...");
    let mut client = serenity::Client::builder(&config.discord_token, intents())
        .event_handler(events::Handler::new(Arc::clone(&data)))
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    let shard_manager = Arc::clone(&client.shard_manager);
    data.set_shard_manager(Arc::clone(&shard_manager));

    let probe = Arc::clone(&data);
    tokio::spawn(async move {
        match probe.wait_for_ready(READY_TIMEOUT).await {
            Ok(()) => debug!("Ready signal received"),
            Err(e) => warn!("{}", e),
        }
    });

    tokio::select! {
        result = client.start() => {
            result.inspect_err(|e| error!("Client error: {:?}", e))?;
        }
        () = shutdown_signal() => {
            logging::shutdown("Shutting down Discord bot...");
            shard_manager.shutdown_all().await;
            info!("Discord client stopped");
        }
    }
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_db, test_config};

    async fn data() -> Result<Arc<BotData>> {
        let db = setup_test_db().await?;
        Ok(Arc::new(BotData::new(
            db,
            Arc::new(test_config()),
            CommandRegistry::new(),
        )))
    }

    #[test]
    fn test_intents_cover_presences_and_members() {
        let intents = intents();
        assert!(intents.contains(serenity::GatewayIntents::GUILD_PRESENCES));
        assert!(intents.contains(serenity::GatewayIntents::GUILD_MEMBERS));
        assert!(intents.contains(serenity::GatewayIntents::MESSAGE_CONTENT));
    }

    #[tokio::test]
    async fn test_wait_for_ready_times_out() -> Result<()> {
        let data = data().await?;
        let result = data.wait_for_ready(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(Error::ReadyTimeout { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_wait_for_ready_wakes_on_ready() -> Result<()> {
        let data = data().await?;
        let waiter = {
            let data = Arc::clone(&data);
            tokio::spawn(async move { data.wait_for_ready(Duration::from_secs(5)).await })
        };
        tokio::task::yield_now().await;
        data.mark_ready();

        assert!(waiter.await.is_ok_and(|r| r.is_ok()));
        assert!(data.wait_for_ready(Duration::from_millis(1)).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_latency_unknown_without_client() -> Result<()> {
        let data = data().await?;
        assert_eq!(data.gateway_latency(ShardId(0)).await, None);
        Ok(())
    }
}
