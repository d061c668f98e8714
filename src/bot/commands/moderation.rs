//! Moderation commands.
//!
//! `kick` and `ban` gather [`GuardFacts`] from the cache and the interaction before
//! their first await, run the guard, notify the target, act, and finish with a
//! success embed plus a security log entry. `clear` drives the purge stages in
//! [`crate::core::purge`] against the live channel.

use crate::{
    bot::command::{
        BoxFuture, CommandDescriptor, Invocation, OptionKind, OptionSpec, integer_option,
        missing_option, string_option, user_option,
    },
    core::{
        format,
        guard::{self, GuardFacts, ModerationAction, TargetMembership},
        purge::{self, Candidate, MessageChannel, PurgeOutcome, PurgeReport, PurgeRequest},
        validation,
    },
    errors::{Error, Result},
    logging,
};
use chrono::Utc;
use poise::serenity_prelude::{
    ChannelId, ChannelType, CommandInteraction, CreateEmbed, CreateEmbedFooter, CreateMessage,
    EditInteractionResponse, GetMessages, Guild, GuildId, Http, MessageId, Permissions, RoleId,
    Timestamp, User, UserId, UserPagination,
};
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Used when the moderator gives no reason.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Most days of message history a ban may delete.
pub const MAX_DELETE_DAYS: u8 = 7;

const SUCCESS_COLOUR: u32 = 0x57F287;
const WARNING_COLOUR: u32 = 0xFEE75C;
const DANGER_COLOUR: u32 = 0xED4245;

/// Permission the bot needs to carry out `action`.
#[must_use]
pub const fn required_permission(action: ModerationAction) -> Permissions {
    match action {
        ModerationAction::Kick => Permissions::KICK_MEMBERS,
        ModerationAction::Ban => Permissions::BAN_MEMBERS,
    }
}

/// Highest role position among `roles`, 0 when the member only has @everyone.
fn highest_rank(roles: &[RoleId], position_of: impl Fn(&RoleId) -> Option<u16>) -> u16 {
    roles.iter().filter_map(position_of).max().unwrap_or(0)
}

/// The reason option, defaulted, or the message rejecting it.
fn checked_reason(reason: Option<&str>) -> std::result::Result<String, &'static str> {
    let reason = reason.map_or(DEFAULT_REASON, str::trim);
    if validation::is_valid_reason(reason) {
        Ok(reason.to_string())
    } else {
        Err("❌ Reason must be 512 characters or fewer.")
    }
}

/// Audit log reason naming the moderator, capped at Discord's limit.
fn audit_reason(reason: &str, moderator: &str) -> String {
    validation::truncate(
        &format!("{reason} | Moderator: {moderator}"),
        validation::MAX_REASON_LENGTH,
    )
}

/// Facts plus the guild name, read out of the cache in one go.
struct GuardSnapshot {
    facts: GuardFacts,
    guild_name: String,
}

/// Guard facts for `target_id` drawn from a cached guild and the interaction.
///
/// Ranks come from role positions alone. The target's roles are taken from the
/// resolved option data first, then from the member cache.
fn guard_facts(
    guild: &Guild,
    interaction: &CommandInteraction,
    bot_id: UserId,
    target_id: UserId,
    action: ModerationAction,
) -> GuardFacts {
    let rank = |roles: &[RoleId]| highest_rank(roles, |id| guild.roles.get(id).map(|r| r.position));

    let actor_rank = interaction.member.as_ref().map_or(0, |m| rank(&m.roles));
    let bot_rank = guild.members.get(&bot_id).map_or(0, |m| rank(&m.roles));

    let target_roles = interaction
        .data
        .resolved
        .members
        .get(&target_id)
        .map(|m| m.roles.as_slice())
        .or_else(|| guild.members.get(&target_id).map(|m| m.roles.as_slice()));
    let actionable = interaction
        .app_permissions
        .is_some_and(|p| p.contains(required_permission(action)));

    GuardFacts {
        in_guild: true,
        actor_id: interaction.user.id,
        target_id,
        bot_id,
        owner_id: Some(guild.owner_id),
        actor_rank,
        bot_rank,
        target: target_roles.map(|roles| TargetMembership {
            highest_rank: rank(roles),
            actionable,
        }),
    }
}

fn snapshot(
    inv: Invocation<'_>,
    guild_id: GuildId,
    target: &User,
    action: ModerationAction,
) -> Result<GuardSnapshot> {
    let bot_id = inv.ctx.cache.current_user().id;
    let guild = inv.ctx.cache.guild(guild_id).ok_or_else(|| Error::Command {
        message: format!("guild {guild_id} is not in the cache"),
    })?;
    Ok(GuardSnapshot {
        facts: guard_facts(&guild, inv.interaction, bot_id, target.id, action),
        guild_name: guild.name.clone(),
    })
}

/// Best effort DM to the moderated user. Failures stay at debug level.
async fn notify(inv: Invocation<'_>, target: &User, embed: CreateEmbed) {
    if let Err(e) = target
        .direct_message(inv.ctx, CreateMessage::new().embed(embed))
        .await
    {
        debug!(user_id = %target.id, "Could not send DM to user: {}", e);
    }
}

fn moderator_footer(inv: Invocation<'_>) -> CreateEmbedFooter {
    CreateEmbedFooter::new(format!("Moderator: {}", inv.user().name)).icon_url(inv.user().face())
}

// kick

/// `/kick <user> [reason]`
#[must_use]
pub fn kick() -> CommandDescriptor {
    CommandDescriptor::new("kick", "Kick a user from the server", kick_action)
        .option(OptionSpec::new("user", "The user to kick", OptionKind::User).required())
        .option(OptionSpec::new(
            "reason",
            "Reason for the kick",
            OptionKind::String,
        ))
        .permission(Permissions::KICK_MEMBERS)
}

fn kick_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_kick(inv))
}

async fn run_kick(inv: Invocation<'_>) -> Result<()> {
    let action = ModerationAction::Kick;
    let Some(guild_id) = inv.guild_id() else {
        return inv
            .responder
            .reply_ephemeral(guard::GuardRejection::NotInGuild.message(action))
            .await;
    };
    let options = inv.options();
    let target = user_option(&options, "user").ok_or_else(|| missing_option("user"))?;
    let reason = match checked_reason(string_option(&options, "reason")) {
        Ok(reason) => reason,
        Err(message) => return inv.responder.reply_ephemeral(message).await,
    };

    let GuardSnapshot { facts, guild_name } = snapshot(inv, guild_id, target, action)?;
    if let Err(rejection) = guard::check(action, &facts) {
        info!(target_id = %target.id, rule = %rejection, "Kick rejected");
        return inv.responder.reply_ephemeral(rejection.message(action)).await;
    }

    notify(
        inv,
        target,
        CreateEmbed::new()
            .title("🦶 You have been kicked")
            .description(format!("You have been kicked from **{guild_name}**"))
            .colour(WARNING_COLOUR)
            .field("Reason", &reason, false)
            .field("Moderator", &inv.user().name, true)
            .timestamp(Timestamp::now()),
    )
    .await;

    if let Err(e) = guild_id
        .kick_with_reason(&inv.ctx.http, target.id, &audit_reason(&reason, &inv.user().name))
        .await
    {
        error!(target_id = %target.id, "Error kicking user: {}", e);
        return inv
            .responder
            .reply_ephemeral("❌ An error occurred while trying to kick the user.")
            .await;
    }

    let embed = CreateEmbed::new()
        .title("✅ User Kicked")
        .colour(SUCCESS_COLOUR)
        .field("User", format!("{} ({})", target.name, target.id), true)
        .field("Moderator", &inv.user().name, true)
        .field("Reason", &reason, false)
        .footer(moderator_footer(inv))
        .timestamp(Timestamp::now());
    inv.responder.reply_embed(embed).await?;

    logging::security(
        "User kicked",
        &inv.user().id.to_string(),
        &json!({
            "targetUserId": target.id.to_string(),
            "targetUsername": target.name,
            "guildId": guild_id.to_string(),
            "reason": reason,
        }),
    );
    Ok(())
}

// ban

/// `/ban <user> [reason] [delete_days]`
#[must_use]
pub fn ban() -> CommandDescriptor {
    CommandDescriptor::new("ban", "Ban a user from the server", ban_action)
        .option(OptionSpec::new("user", "The user to ban", OptionKind::User).required())
        .option(OptionSpec::new(
            "reason",
            "Reason for the ban",
            OptionKind::String,
        ))
        .option(
            OptionSpec::new(
                "delete_days",
                "Number of days of messages to delete (0-7)",
                OptionKind::Integer,
            )
            .range(0, u64::from(MAX_DELETE_DAYS)),
        )
        .permission(Permissions::BAN_MEMBERS)
}

fn ban_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_ban(inv))
}

/// Clamps the `delete_days` option into `0..=7`.
fn delete_days(value: Option<i64>) -> u8 {
    value.map_or(0, |days| {
        u8::try_from(days.clamp(0, i64::from(MAX_DELETE_DAYS))).unwrap_or(0)
    })
}

/// Bans Discord returns per page when no limit is given.
const BAN_PAGE_SIZE: usize = 1000;

/// Where one page of the ban list leaves the search for a user.
#[derive(Debug, PartialEq, Eq)]
enum BanScan {
    Found,
    /// Fetch the page after this user id
    Next(UserId),
    Exhausted,
}

/// Pages are sorted by user id, so the search stops early once it passes `target`.
fn scan_ban_page(page: &[UserId], target: UserId) -> BanScan {
    if page.contains(&target) {
        return BanScan::Found;
    }
    match page.last() {
        Some(&last) if page.len() >= BAN_PAGE_SIZE && last < target => BanScan::Next(last),
        _ => BanScan::Exhausted,
    }
}

async fn is_banned(http: &Http, guild_id: GuildId, target: UserId) -> Result<bool> {
    let mut after = None;
    loop {
        let page: Vec<UserId> = guild_id
            .bans(http, after.map(UserPagination::After), None)
            .await?
            .into_iter()
            .map(|ban| ban.user.id)
            .collect();
        match scan_ban_page(&page, target) {
            BanScan::Found => return Ok(true),
            BanScan::Next(last) => after = Some(last),
            BanScan::Exhausted => return Ok(false),
        }
    }
}

async fn run_ban(inv: Invocation<'_>) -> Result<()> {
    let action = ModerationAction::Ban;
    let Some(guild_id) = inv.guild_id() else {
        return inv
            .responder
            .reply_ephemeral(guard::GuardRejection::NotInGuild.message(action))
            .await;
    };
    let options = inv.options();
    let target = user_option(&options, "user").ok_or_else(|| missing_option("user"))?;
    let reason = match checked_reason(string_option(&options, "reason")) {
        Ok(reason) => reason,
        Err(message) => return inv.responder.reply_ephemeral(message).await,
    };
    let days = delete_days(integer_option(&options, "delete_days"));

    let GuardSnapshot { facts, guild_name } = snapshot(inv, guild_id, target, action)?;
    if let Err(rejection) = guard::check(action, &facts) {
        info!(target_id = %target.id, rule = %rejection, "Ban rejected");
        return inv.responder.reply_ephemeral(rejection.message(action)).await;
    }

    match is_banned(&inv.ctx.http, guild_id, target.id).await {
        Ok(true) => {
            return inv
                .responder
                .reply_ephemeral("❌ This user is already banned.")
                .await;
        }
        Ok(false) => {}
        Err(e) => warn!(target_id = %target.id, "Ban lookup failed, continuing: {}", e),
    }

    // Users outside the guild share no server with the bot, so a DM cannot reach them.
    if facts.target.is_some() {
        notify(
            inv,
            target,
            CreateEmbed::new()
                .title("🔨 You have been banned")
                .description(format!("You have been banned from **{guild_name}**"))
                .colour(DANGER_COLOUR)
                .field("Reason", &reason, false)
                .field("Moderator", &inv.user().name, true)
                .timestamp(Timestamp::now()),
        )
        .await;
    }

    if let Err(e) = guild_id
        .ban_with_reason(
            &inv.ctx.http,
            target.id,
            days,
            &audit_reason(&reason, &inv.user().name),
        )
        .await
    {
        error!(target_id = %target.id, "Error banning user: {}", e);
        return inv
            .responder
            .reply_ephemeral("❌ An error occurred while trying to ban the user.")
            .await;
    }

    let mut embed = CreateEmbed::new()
        .title("✅ User Banned")
        .colour(SUCCESS_COLOUR)
        .field("User", format!("{} ({})", target.name, target.id), true)
        .field("Moderator", &inv.user().name, true)
        .field("Reason", &reason, false);
    if days > 0 {
        embed = embed.field(
            "Messages Deleted",
            format!("{} worth of messages", format::pluralize(usize::from(days), "day")),
            true,
        );
    }
    inv.responder
        .reply_embed(embed.footer(moderator_footer(inv)).timestamp(Timestamp::now()))
        .await?;

    logging::security(
        "User banned",
        &inv.user().id.to_string(),
        &json!({
            "targetUserId": target.id.to_string(),
            "targetUsername": target.name,
            "guildId": guild_id.to_string(),
            "reason": reason,
            "deleteMessageDays": days,
        }),
    );
    Ok(())
}

// clear

/// `/clear <amount> [user]`
#[must_use]
pub fn clear() -> CommandDescriptor {
    CommandDescriptor::new("clear", "Clear messages from the channel", clear_action)
        .option(
            OptionSpec::new(
                "amount",
                "Number of messages to delete (1-100)",
                OptionKind::Integer,
            )
            .required()
            .range(1, 100),
        )
        .option(OptionSpec::new(
            "user",
            "Only delete messages from this user",
            OptionKind::User,
        ))
        .permission(Permissions::MANAGE_MESSAGES)
}

fn clear_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_clear(inv))
}

/// Channel kinds that hold a message history.
const fn is_text_capable(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::Voice
            | ChannelType::Stage
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::NewsThread
    )
}

/// [`MessageChannel`] backed by the Discord REST API.
struct DiscordChannel<'a> {
    http: &'a Http,
    channel_id: ChannelId,
}

impl MessageChannel for DiscordChannel<'_> {
    async fn fetch_recent(&self, limit: u8) -> Result<Vec<Candidate>> {
        let messages = self
            .channel_id
            .messages(self.http, GetMessages::new().limit(limit))
            .await?;
        Ok(messages
            .iter()
            .map(|message| Candidate {
                id: message.id,
                author: message.author.id,
                created_at: format::snowflake_datetime(message.id.get()),
            })
            .collect())
    }

    async fn delete_one(&self, id: MessageId) -> Result<()> {
        self.channel_id.delete_message(self.http, id).await?;
        Ok(())
    }

    async fn delete_bulk(&self, ids: Vec<MessageId>) -> Result<usize> {
        self.channel_id.delete_messages(self.http, &ids).await?;
        Ok(ids.len())
    }
}

fn clear_embed(
    report: PurgeReport,
    channel_id: ChannelId,
    moderator: &str,
    target: Option<&User>,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("✅ Messages Cleared")
        .colour(SUCCESS_COLOUR)
        .field("Messages Deleted", report.deleted.to_string(), true)
        .field("Channel", format!("<#{channel_id}>"), true)
        .field("Moderator", moderator, true);
    if let Some(target) = target {
        embed = embed.field("Target User", format!("{} ({})", target.name, target.id), true);
    }
    if report.skipped_too_old > 0 {
        embed = embed.field(
            "⚠️ Note",
            format!(
                "{} older than 14 days could not be deleted.",
                format::pluralize(report.skipped_too_old, "message")
            ),
            false,
        );
    }
    embed.timestamp(Timestamp::now())
}

async fn run_clear(inv: Invocation<'_>) -> Result<()> {
    let Some(guild_id) = inv.guild_id() else {
        return inv
            .responder
            .reply_ephemeral("❌ This command can only be used in a server.")
            .await;
    };
    let options = inv.options();
    let amount = integer_option(&options, "amount").ok_or_else(|| missing_option("amount"))?;
    let amount = u8::try_from(amount.clamp(1, 100)).map_err(|_| Error::Validation {
        field: "amount".to_string(),
        message: "must be between 1 and 100".to_string(),
    })?;
    let target = user_option(&options, "user");

    let request = PurgeRequest {
        amount,
        author: target.map(|user| user.id),
        text_capable: inv
            .interaction
            .channel
            .as_ref()
            .is_some_and(|channel| is_text_capable(channel.kind)),
        can_manage_messages: inv
            .interaction
            .app_permissions
            .is_some_and(|p| p.manage_messages()),
    };
    if let Err(abort) = purge::validate(&request) {
        return inv.responder.reply_ephemeral(abort.message()).await;
    }

    inv.responder.defer_ephemeral().await?;

    let channel_id = inv.interaction.channel_id;
    let channel = DiscordChannel {
        http: &inv.ctx.http,
        channel_id,
    };
    let report = match purge::execute(&channel, &request, Utc::now()).await {
        Ok(PurgeOutcome::Completed(report)) => report,
        Ok(PurgeOutcome::Aborted(abort)) => {
            inv.responder
                .edit(EditInteractionResponse::new().content(abort.message()))
                .await?;
            return Ok(());
        }
        Err(e) => {
            error!(channel_id = %channel_id, "Error clearing messages: {}", e);
            inv.responder
                .edit(
                    EditInteractionResponse::new()
                        .content("❌ An error occurred while trying to delete messages."),
                )
                .await?;
            return Ok(());
        }
    };

    let embed = clear_embed(report, channel_id, &inv.user().name, target);
    inv.responder
        .edit(EditInteractionResponse::new().embed(embed))
        .await?;

    logging::security(
        "Messages cleared",
        &inv.user().id.to_string(),
        &json!({
            "channelId": channel_id.to_string(),
            "guildId": guild_id.to_string(),
            "amount": report.deleted,
            "skippedTooOld": report.skipped_too_old,
            "targetUserId": target.map(|user| user.id.to_string()),
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::{Member, PartialMember};
    use serde_json::Value;

    const ACTOR: UserId = UserId::new(100_000_000_000_000_001);
    const TARGET: UserId = UserId::new(100_000_000_000_000_002);
    const BOT: UserId = UserId::new(200_000_000_000_000_001);

    fn member(id: UserId) -> Member {
        let mut member = Member::default();
        member.user.id = id;
        member
    }

    fn guild_with(members: &[UserId]) -> Guild {
        let mut guild = Guild::default();
        guild.owner_id = UserId::new(900_000_000_000_000_001);
        for &id in members {
            guild.members.insert(id, member(id));
        }
        guild
    }

    fn empty_partial_member() -> PartialMember {
        serde_json::from_value(json!({ "roles": [] })).expect("minimal partial member fixture")
    }

    fn interaction(permissions: Option<Permissions>) -> CommandInteraction {
        let mut interaction: CommandInteraction = serde_json::from_value(json!({
            "id": "1",
            "application_id": "1",
            "data": { "id": "1", "name": "", "type": 1 },
            "channel_id": "1",
            "token": "",
            "version": 1,
            "locale": "",
            "entitlements": [],
            "attachment_size_limit": 0,
        }))
        .expect("minimal command interaction fixture");
        interaction.user.id = ACTOR;
        interaction.member = Some(Box::new(member(ACTOR)));
        interaction.app_permissions = permissions;
        interaction
    }

    #[test]
    fn test_required_permissions() {
        assert_eq!(
            required_permission(ModerationAction::Kick),
            Permissions::KICK_MEMBERS
        );
        assert_eq!(
            required_permission(ModerationAction::Ban),
            Permissions::BAN_MEMBERS
        );
    }

    #[test]
    fn test_highest_rank() {
        let roles = [RoleId::new(1), RoleId::new(2), RoleId::new(3)];
        let position = |id: &RoleId| match id.get() {
            1 => Some(4),
            2 => Some(9),
            _ => None,
        };
        assert_eq!(highest_rank(&roles, position), 9);
        assert_eq!(highest_rank(&[], position), 0);
    }

    #[test]
    fn test_checked_reason() {
        assert_eq!(checked_reason(None).as_deref(), Ok(DEFAULT_REASON));
        assert_eq!(checked_reason(Some("  spam  ")).as_deref(), Ok("spam"));
        assert!(checked_reason(Some(&"x".repeat(513))).is_err());
    }

    #[test]
    fn test_audit_reason_is_capped() {
        assert_eq!(audit_reason("spam", "mod"), "spam | Moderator: mod");
        let long = audit_reason(&"x".repeat(512), "mod");
        assert!(long.chars().count() <= validation::MAX_REASON_LENGTH);
    }

    #[test]
    fn test_delete_days_clamped() {
        assert_eq!(delete_days(None), 0);
        assert_eq!(delete_days(Some(3)), 3);
        assert_eq!(delete_days(Some(30)), MAX_DELETE_DAYS);
        assert_eq!(delete_days(Some(-1)), 0);
    }

    #[test]
    fn test_text_capable_channels() {
        assert!(is_text_capable(ChannelType::Text));
        assert!(is_text_capable(ChannelType::PublicThread));
        assert!(!is_text_capable(ChannelType::Category));
        assert!(!is_text_capable(ChannelType::Forum));
    }

    #[test]
    fn test_clear_embed_notes_skipped_messages() {
        let report = PurgeReport {
            deleted: 3,
            skipped_too_old: 2,
        };
        let embed = serde_json::to_value(clear_embed(report, ChannelId::new(42), "mod", None))
            .unwrap_or(Value::Null);

        assert_eq!(embed["title"], "✅ Messages Cleared");
        let fields = embed["fields"].as_array().cloned().unwrap_or_default();
        assert_eq!(fields[0]["value"], "3");
        assert_eq!(fields[1]["value"], "<#42>");
        assert!(fields.iter().all(|f| f["name"] != "Target User"));
        assert_eq!(
            fields.last().map(|f| f["value"].clone()),
            Some(json!("2 messages older than 14 days could not be deleted."))
        );
    }

    #[test]
    fn test_guard_facts_prefers_resolved_member() {
        let guild = guild_with(&[BOT]);
        let mut interaction = interaction(Some(Permissions::BAN_MEMBERS));
        interaction
            .data
            .resolved
            .members
            .insert(TARGET, empty_partial_member());

        let facts = guard_facts(&guild, &interaction, BOT, TARGET, ModerationAction::Ban);
        assert_eq!(facts.actor_id, ACTOR);
        assert_eq!(facts.owner_id, Some(guild.owner_id));
        assert_eq!(
            facts.target,
            Some(TargetMembership {
                highest_rank: 0,
                actionable: true,
            })
        );
    }

    #[test]
    fn test_guard_facts_falls_back_to_cached_member() {
        let guild = guild_with(&[BOT, TARGET]);
        let facts = guard_facts(
            &guild,
            &interaction(Some(Permissions::KICK_MEMBERS)),
            BOT,
            TARGET,
            ModerationAction::Kick,
        );
        assert!(facts.target.is_some_and(|t| t.actionable));
    }

    #[test]
    fn test_guard_facts_without_membership() {
        let guild = guild_with(&[BOT]);
        let facts = guard_facts(
            &guild,
            &interaction(Some(Permissions::BAN_MEMBERS)),
            BOT,
            TARGET,
            ModerationAction::Ban,
        );
        assert_eq!(facts.target, None);
        assert_eq!(
            guard::check(ModerationAction::Kick, &facts),
            Err(guard::GuardRejection::TargetNotMember)
        );
    }

    #[test]
    fn test_guard_facts_actionable_needs_matching_permission() {
        let guild = guild_with(&[BOT, TARGET]);
        for permissions in [None, Some(Permissions::KICK_MEMBERS)] {
            let facts = guard_facts(
                &guild,
                &interaction(permissions),
                BOT,
                TARGET,
                ModerationAction::Ban,
            );
            assert!(facts.target.is_some_and(|t| !t.actionable));
        }
    }

    #[test]
    fn test_guild_owner_ranks_by_roles() {
        let mut guild = guild_with(&[BOT, TARGET]);
        guild.owner_id = ACTOR;
        let facts = guard_facts(
            &guild,
            &interaction(Some(Permissions::KICK_MEMBERS)),
            BOT,
            TARGET,
            ModerationAction::Kick,
        );
        assert_eq!(facts.actor_rank, 0);
        assert_eq!(
            guard::check(ModerationAction::Kick, &facts),
            Err(guard::GuardRejection::ActorHierarchy)
        );
    }

    #[test]
    fn test_scan_ban_page() {
        assert_eq!(scan_ban_page(&[ACTOR, TARGET], TARGET), BanScan::Found);
        assert_eq!(scan_ban_page(&[], TARGET), BanScan::Exhausted);
        assert_eq!(scan_ban_page(&[ACTOR], TARGET), BanScan::Exhausted);

        let full: Vec<UserId> = (1..=1000).map(UserId::new).collect();
        assert_eq!(scan_ban_page(&full, TARGET), BanScan::Next(UserId::new(1000)));
        assert_eq!(scan_ban_page(&full, UserId::new(5)), BanScan::Found);
        assert_eq!(scan_ban_page(&full[1..], UserId::new(1)), BanScan::Exhausted);
    }
}
