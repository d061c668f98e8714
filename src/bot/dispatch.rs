//! Routes slash command interactions to registered commands.
//!
//! Every invocation is isolated: an error returned by a command is logged and turned
//! into an ephemeral message for the user, and the bot keeps running. When the
//! command already replied or deferred before failing, the message goes out as a
//! follow-up because a second initial response would be rejected by Discord.

use crate::{
    bot::registry::{CommandRegistry, Named},
    errors::Result,
    logging,
};
use std::future::Future;
use tracing::{debug, error, warn};

/// Sent when an interaction names a command the bot does not know.
pub const UNKNOWN_COMMAND_MESSAGE: &str =
    "❌ Unknown command. Please use `/help` to see available commands.";

/// Sent when a command fails with an unexpected error.
pub const COMMAND_ERROR_MESSAGE: &str = "❌ There was an error while executing this command!";

/// The response side of an interaction, as far as the dispatcher needs it.
pub trait Responder {
    /// Initial ephemeral response.
    fn reply(&self, content: &str) -> impl Future<Output = Result<()>> + Send;

    /// Ephemeral follow-up after the initial response.
    fn follow_up(&self, content: &str) -> impl Future<Output = Result<()>> + Send;

    /// Whether an initial response (reply or deferral) was already sent.
    fn is_acknowledged(&self) -> bool;
}

/// Who invoked what, for logging.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    /// Command name from the interaction
    pub command: &'a str,
    /// Invoking user
    pub user_id: String,
    /// Guild, absent in DMs
    pub guild_id: Option<String>,
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command with that name
    Unknown,
    /// The command ran to completion
    Completed,
    /// The command returned an error
    Failed,
}

/// Looks up `call.command` and runs it through `invoke`.
pub async fn dispatch<'r, D, R, F, Fut>(
    registry: &'r CommandRegistry<D>,
    call: &CallSite<'_>,
    responder: &R,
    invoke: F,
) -> DispatchOutcome
where
    D: Named,
    R: Responder + Sync,
    F: FnOnce(&'r D) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Some(descriptor) = registry.lookup(call.command) else {
        warn!(
            command = call.command,
            user_id = %call.user_id,
            guild_id = ?call.guild_id,
            "Unknown command attempted"
        );
        if let Err(e) = responder.reply(UNKNOWN_COMMAND_MESSAGE).await {
            error!("Failed to send unknown command reply: {}", e);
        }
        return DispatchOutcome::Unknown;
    };

    logging::command(call.command, &call.user_id, call.guild_id.as_deref());

    match invoke(descriptor).await {
        Ok(()) => {
            debug!(command = call.command, "Command executed successfully");
            DispatchOutcome::Completed
        }
        Err(e) => {
            error!(command = call.command, error = ?e, "Error executing command: {}", e);
            let sent = if responder.is_acknowledged() {
                responder.follow_up(COMMAND_ERROR_MESSAGE).await
            } else {
                responder.reply(COMMAND_ERROR_MESSAGE).await
            };
            if let Err(e) = sent {
                error!(command = call.command, "Failed to send error message to user: {}", e);
            }
            DispatchOutcome::Failed
        }
    }
}
