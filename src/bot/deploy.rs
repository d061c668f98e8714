//! Publishing command schemas to Discord.
//!
//! Guild-scoped registration shows up immediately and is meant for development.
//! Global registration can take up to an hour to reach every client.

use crate::{
    bot::command::{CommandDescriptor, OptionKind, OptionSpec},
    errors::Result,
};
use poise::serenity_prelude::{
    Command, CommandOptionType, CreateCommand, CreateCommandOption, GuildId, Http,
};
use tracing::{info, instrument, warn};

/// Where commands are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A single guild
    Guild(GuildId),
    /// Every guild and DM
    Global,
}

impl Scope {
    /// Guild scope when a development guild is configured, global otherwise.
    #[must_use]
    pub fn from_config(guild_id: Option<u64>) -> Self {
        guild_id.map_or(Self::Global, |id| Self::Guild(GuildId::new(id)))
    }
}

const fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::User => CommandOptionType::User,
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
    }
}

fn create_option(spec: &OptionSpec) -> CreateCommandOption {
    let mut option = CreateCommandOption::new(option_type(spec.kind), spec.name, spec.description)
        .required(spec.required);
    if let Some(min) = spec.min_value {
        option = option.min_int_value(min);
    }
    if let Some(max) = spec.max_value {
        option = option.max_int_value(max);
    }
    option
}

/// The registration payload for one descriptor.
#[must_use]
pub fn create_command(descriptor: &CommandDescriptor) -> CreateCommand {
    let mut command = CreateCommand::new(descriptor.name).description(descriptor.description);
    if let Some(permission) = descriptor.required_permission {
        command = command.default_member_permissions(permission);
    }
    descriptor
        .options
        .iter()
        .fold(command, |command, option| command.add_option(create_option(option)))
}

/// Replaces the commands registered in `scope` with `descriptors`.
#[instrument(skip(http, descriptors))]
pub async fn deploy(http: &Http, descriptors: &[CommandDescriptor], scope: Scope) -> Result<usize> {
    let commands: Vec<CreateCommand> = descriptors.iter().map(create_command).collect();
    info!(count = commands.len(), "Started refreshing application (/) commands");

    let deployed = match scope {
        Scope::Guild(guild_id) => guild_id.set_commands(http, commands).await?,
        Scope::Global => {
            let deployed = Command::set_global_commands(http, commands).await?;
            warn!("Global commands may take up to one hour to propagate");
            deployed
        }
    };

    info!(count = deployed.len(), "Successfully reloaded application (/) commands");
    Ok(deployed.len())
}

/// Removes every command registered in `scope`.
#[instrument(skip(http))]
pub async fn remove(http: &Http, scope: Scope) -> Result<()> {
    match scope {
        Scope::Guild(guild_id) => {
            guild_id.set_commands(http, Vec::new()).await?;
            info!(%guild_id, "Removed all guild commands");
        }
        Scope::Global => {
            Command::set_global_commands(http, Vec::new()).await?;
            info!("Removed all global commands");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::commands;
    use serde_json::Value;

    fn payload(name: &str) -> Value {
        let descriptors = commands::all();
        let descriptor = descriptors
            .iter()
            .find(|d| d.name == name)
            .map(create_command);
        serde_json::to_value(descriptor).unwrap_or(Value::Null)
    }

    #[test]
    fn test_scope_from_config() {
        assert_eq!(Scope::from_config(None), Scope::Global);
        assert_eq!(
            Scope::from_config(Some(300_000_000_000_000_001)),
            Scope::Guild(GuildId::new(300_000_000_000_000_001))
        );
    }

    #[test]
    fn test_clear_payload_carries_bounds_and_permission() {
        let clear = payload("clear");

        assert_eq!(clear["name"], "clear");
        assert_eq!(clear["options"][0]["name"], "amount");
        assert_eq!(clear["options"][0]["required"], true);
        assert_eq!(clear["options"][0]["min_value"], 1);
        assert_eq!(clear["options"][0]["max_value"], 100);
        assert!(!clear["default_member_permissions"].is_null());
    }

    #[test]
    fn test_ping_payload_has_no_options() {
        let ping = payload("ping");
        assert_eq!(ping["description"], "Replies with Pong! and shows bot latency");
        assert!(ping["options"].as_array().is_none_or(Vec::is_empty));
    }
}
