//! Gateway event handler.
//!
//! Slash commands go through the dispatcher. Guild and member events keep the
//! database in step with what the bot observes; their failures are logged and never
//! interrupt the event's other effects.

use crate::{
    bot::{
        BotData,
        command::Invocation,
        dispatch::{CallSite, dispatch},
        responder::InteractionResponder,
    },
    core::{format, guilds, memberships, users},
    errors::Result,
    logging,
};
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{
    self as serenity, ActivityData, ChannelId, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, Context, CreateEmbed, CreateMessage, Guild, Interaction, Member,
    ModalInteraction, Ready, ResumedEvent, Timestamp, UnavailableGuild, UserId,
};
use sea_orm::ConnectionTrait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Discord blurple.
pub const EMBED_COLOUR: u32 = 0x5865F2;

/// Routes gateway events into the bot.
pub struct Handler {
    data: Arc<BotData>,
}

impl Handler {
    /// Handler sharing `data` with the rest of the bot.
    #[must_use]
    pub const fn new(data: Arc<BotData>) -> Self {
        Self { data }
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let responder = InteractionResponder::new(&ctx.http, command);
        let invocation = Invocation {
            ctx,
            interaction: command,
            data: &self.data,
            responder: &responder,
        };
        let call = CallSite {
            command: &command.data.name,
            user_id: command.user.id.to_string(),
            guild_id: command.guild_id.map(|id| id.to_string()),
        };

        dispatch(&self.data.registry, &call, &responder, |descriptor| {
            (descriptor.action)(invocation)
        })
        .await;
    }
}

/// Upserts the member's user row and, once the guild is recorded, their
/// membership. Returns whether a membership row was written.
async fn record_member<C: ConnectionTrait>(db: &C, member: &Member) -> Result<bool> {
    let user = &member.user;
    let user_id = user.id.to_string();
    let guild_id = member.guild_id.to_string();

    users::create_or_update_user(db, &user_id, &user.name, &discriminator(user)).await?;

    if !guilds::exists(db, &guild_id).await? {
        debug!(guild_id = %guild_id, "Guild not recorded yet, skipping membership");
        return Ok(false);
    }

    let roles: Vec<String> = member.roles.iter().map(ToString::to_string).collect();
    let joined_at = member
        .joined_at
        .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0))
        .unwrap_or_else(Utc::now);
    memberships::record_membership(db, &user_id, &guild_id, &roles, joined_at).await?;
    Ok(true)
}

/// Settings stored for a guild the bot has just seen.
fn guild_settings(guild: &Guild, joined_at: DateTime<Utc>) -> guilds::GuildSettings {
    let mut settings = guilds::GuildSettings::new();
    settings.insert("ownerId".to_string(), json!(guild.owner_id.to_string()));
    settings.insert("memberCount".to_string(), json!(guild.member_count));
    settings.insert("joinedAt".to_string(), json!(joined_at.to_rfc3339()));
    settings
}

/// Legacy four digit discriminator, `0` for accounts without one.
fn discriminator(user: &serenity::User) -> String {
    user.discriminator
        .map_or_else(|| "0".to_string(), |d| format!("{:04}", d.get()))
}

/// System channel the bot may post its welcome message to.
fn welcome_channel(guild: &Guild, bot_id: UserId) -> Option<ChannelId> {
    let channel_id = guild.system_channel_id?;
    let channel = guild.channels.get(&channel_id)?;
    let Some(me) = guild.members.get(&bot_id) else {
        // Without our own member we cannot compute permissions; try anyway.
        return Some(channel_id);
    };
    guild
        .user_permissions_in(channel, me)
        .send_messages()
        .then_some(channel_id)
}

fn welcome_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("👋 Hello!")
        .description("Thanks for adding me to your server! Use `/help` to see available commands.")
        .colour(EMBED_COLOUR)
        .timestamp(Timestamp::now())
}

fn component_event(component: &ComponentInteraction) {
    let base = json!({
        "customId": component.data.custom_id,
        "userId": component.user.id.to_string(),
        "guildId": component.guild_id.map(|id| id.to_string()),
    });
    match &component.data.kind {
        ComponentInteractionDataKind::Button => logging::event("Button interaction", &base),
        ComponentInteractionDataKind::StringSelect { values } => {
            let mut details = base;
            details["values"] = json!(values);
            logging::event("Select menu interaction", &details);
        }
        _ => logging::event("Component interaction", &base),
    }
}

fn modal_event(modal: &ModalInteraction) {
    logging::event(
        "Modal submission",
        &json!({
            "customId": modal.data.custom_id,
            "userId": modal.user.id.to_string(),
            "guildId": modal.guild_id.map(|id| id.to_string()),
        }),
    );
}

#[serenity::async_trait]
impl serenity::EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        logging::startup(&format!("🤖 {} is now online!", ready.user.tag()));

        let guild_count = ready.guilds.len();
        info!(
            guilds = guild_count,
            users = ctx.cache.user_count(),
            shard = ?ready.shard,
            "Bot statistics"
        );

        ctx.set_activity(Some(ActivityData::watching(format!(
            "{} | /help",
            format::pluralize(guild_count, "server")
        ))));
        info!("Bot presence set successfully");

        self.data.mark_ready();
        logging::startup("Bot initialization completed");
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        info!("Connection to Discord resumed");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.handle_command(&ctx, &command).await,
            Interaction::Component(component) => component_event(&component),
            Interaction::Modal(modal) => modal_event(&modal),
            _ => {}
        }
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        let joined = is_new == Some(true);
        logging::event(
            if joined { "Bot added to guild" } else { "Guild available" },
            &json!({
                "guildId": guild.id.to_string(),
                "guildName": guild.name,
                "memberCount": guild.member_count,
                "ownerId": guild.owner_id.to_string(),
            }),
        );

        let settings = guild_settings(&guild, Utc::now());

        let guild_id = guild.id.to_string();
        match guilds::create_or_update_guild(&self.data.database, &guild_id, &guild.name, Some(&settings))
            .await
        {
            Ok(_) => logging::database("upsert", "guilds", &guild_id),
            Err(e) => error!(guild_id = %guild_id, "Failed to record guild: {}", e),
        }

        if !joined {
            return;
        }
        let bot_id = ctx.cache.current_user().id;
        if let Some(channel) = welcome_channel(&guild, bot_id) {
            if let Err(e) = channel
                .send_message(&ctx.http, CreateMessage::new().embed(welcome_embed()))
                .await
            {
                error!(guild_id = %guild_id, "Failed to send welcome message: {}", e);
            }
        }
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        // Rows are kept so a re-added bot finds its previous settings.
        let name = full.as_ref().map(|guild| guild.name.clone());
        let event = if incomplete.unavailable {
            "Guild became unavailable"
        } else {
            "Bot removed from guild"
        };
        logging::event(
            event,
            &json!({ "guildId": incomplete.id.to_string(), "guildName": name }),
        );
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        logging::event(
            "Member joined",
            &json!({
                "userId": new_member.user.id.to_string(),
                "username": new_member.user.name,
                "guildId": new_member.guild_id.to_string(),
            }),
        );

        if let Err(e) = record_member(&self.data.database, &new_member).await {
            error!(user_id = %new_member.user.id, "Failed to record member: {}", e);
        }
    }
}
