//! Informational commands. They read from the cache and the registry and never
//! touch the database.

use crate::{
    bot::{
        command::{
            BoxFuture, CommandDescriptor, Invocation, OptionKind, OptionSpec, string_option,
            user_option,
        },
        events::EMBED_COLOUR,
        registry::{Category, CommandRegistry},
    },
    core::format,
    errors::Result,
};
use poise::serenity_prelude::{
    ChannelType, CreateEmbed, CreateEmbedFooter, CreateInteractionResponseMessage,
    EditInteractionResponse, Guild, OnlineStatus, Permissions, PremiumTier, RoleId, Timestamp,
    User, UserId, VerificationLevel,
};
use tracing::info;

/// Roles listed by `/userinfo` before the list is cut off.
pub const MAX_LISTED_ROLES: usize = 10;

/// Permissions `/userinfo` calls out, in display order.
const KEY_PERMISSIONS: [(Permissions, &str); 6] = [
    (Permissions::MANAGE_GUILD, "Manage Server"),
    (Permissions::MANAGE_ROLES, "Manage Roles"),
    (Permissions::MANAGE_CHANNELS, "Manage Channels"),
    (Permissions::MODERATE_MEMBERS, "Moderate Members"),
    (Permissions::KICK_MEMBERS, "Kick Members"),
    (Permissions::BAN_MEMBERS, "Ban Members"),
];

// ping

/// `/ping`
#[must_use]
pub fn ping() -> CommandDescriptor {
    CommandDescriptor::new(
        "ping",
        "Replies with Pong! and shows bot latency",
        ping_action,
    )
}

fn ping_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_ping(inv))
}

async fn run_ping(inv: Invocation<'_>) -> Result<()> {
    inv.responder
        .send(CreateInteractionResponseMessage::new().content("Pinging..."))
        .await?;
    let sent = inv.responder.original_response().await?;

    let round_trip = format::snowflake_gap_millis(inv.interaction.id.get(), sent.id.get());
    let gateway = inv.data.gateway_latency(inv.ctx.shard_id).await;

    let embed = CreateEmbed::new()
        .title("🏓 Pong!")
        .colour(EMBED_COLOUR)
        .field("Bot Latency", format!("{round_trip}ms"), true)
        .field("API Latency", format::format_latency(gateway), true)
        .timestamp(Timestamp::now());
    inv.responder
        .edit(EditInteractionResponse::new().content("").embed(embed))
        .await?;

    info!(latency_ms = round_trip, "Ping command executed");
    Ok(())
}

// info

/// `/info`
#[must_use]
pub fn info() -> CommandDescriptor {
    CommandDescriptor::new("info", "Shows information about the bot", info_action)
}

fn info_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_info(inv))
}

/// Counts shown in the statistics field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BotStatistics {
    guilds: usize,
    users: usize,
    channels: usize,
}

async fn run_info(inv: Invocation<'_>) -> Result<()> {
    let cache = &inv.ctx.cache;
    let guild_ids = cache.guilds();
    let stats = BotStatistics {
        guilds: guild_ids.len(),
        users: cache.user_count(),
        channels: guild_ids
            .iter()
            .filter_map(|id| cache.guild(*id).map(|guild| guild.channels.len()))
            .sum(),
    };
    let (bot_id, avatar) = {
        let me = cache.current_user();
        (me.id, me.face())
    };
    let gateway = inv.data.gateway_latency(inv.ctx.shard_id).await;

    let embed = CreateEmbed::new()
        .title("🤖 Bot Information")
        .colour(EMBED_COLOUR)
        .thumbnail(avatar)
        .field("📊 Statistics", statistics_text(stats), true)
        .field(
            "⚡ Performance",
            format!(
                "**Uptime:** {}\n**Ping:** {}",
                format::format_uptime(inv.data.uptime()),
                format::format_latency(gateway)
            ),
            true,
        )
        .field(
            "🔧 Technical",
            format!(
                "**Version:** {}\n**Library:** serenity\n**Environment:** {}",
                env!("CARGO_PKG_VERSION"),
                inv.data.config.environment
            ),
            true,
        )
        .footer(CreateEmbedFooter::new(format!("Bot ID: {bot_id}")))
        .timestamp(Timestamp::now());

    inv.responder.reply_embed(embed).await
}

fn statistics_text(stats: BotStatistics) -> String {
    format!(
        "**Servers:** {}\n**Users:** {}\n**Channels:** {}",
        stats.guilds, stats.users, stats.channels
    )
}

// help

/// `/help [command]`
#[must_use]
pub fn help() -> CommandDescriptor {
    CommandDescriptor::new("help", "Shows all available commands", help_action).option(
        OptionSpec::new(
            "command",
            "Get detailed help for a specific command",
            OptionKind::String,
        ),
    )
}

fn help_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_help(inv))
}

async fn run_help(inv: Invocation<'_>) -> Result<()> {
    let options = inv.options();
    let registry = &inv.data.registry;

    match string_option(&options, "command") {
        None => inv.responder.reply_embed(help_overview(registry)).await,
        Some(name) => match registry.lookup(name) {
            Some(descriptor) => inv.responder.reply_embed(help_detail(descriptor)).await,
            None => {
                inv.responder
                    .reply_ephemeral(format!("❌ Command `{name}` not found."))
                    .await
            }
        },
    }
}

/// One line per command, split into general and moderation.
fn overview_lines(registry: &CommandRegistry<CommandDescriptor>) -> (Vec<String>, Vec<String>) {
    registry
        .all()
        .iter()
        .map(|d| (Category::of(d.name), format!("`/{}` - {}", d.name, d.description)))
        .fold((Vec::new(), Vec::new()), |(mut general, mut moderation), (category, line)| {
            match category {
                Category::General => general.push(line),
                Category::Moderation => moderation.push(line),
            }
            (general, moderation)
        })
}

fn help_overview(registry: &CommandRegistry<CommandDescriptor>) -> CreateEmbed {
    let (general, moderation) = overview_lines(registry);
    let mut embed = CreateEmbed::new()
        .title("📚 Available Commands")
        .description("Here are all the available commands for this bot:")
        .colour(EMBED_COLOUR);
    if !general.is_empty() {
        embed = embed.field("🔧 General Commands", general.join("\n"), false);
    }
    if !moderation.is_empty() {
        embed = embed.field("🛡️ Moderation Commands", moderation.join("\n"), false);
    }
    embed
        .footer(CreateEmbedFooter::new(format!(
            "Total commands: {}",
            registry.len()
        )))
        .timestamp(Timestamp::now())
}

/// `/clear <amount> [user]`
fn usage(descriptor: &CommandDescriptor) -> String {
    descriptor
        .options
        .iter()
        .fold(format!("/{}", descriptor.name), |usage, option| {
            if option.required {
                format!("{usage} <{}>", option.name)
            } else {
                format!("{usage} [{}]", option.name)
            }
        })
}

fn option_lines(descriptor: &CommandDescriptor) -> Option<String> {
    if descriptor.options.is_empty() {
        return None;
    }
    let lines: Vec<String> = descriptor
        .options
        .iter()
        .map(|option| {
            let presence = if option.required { "required" } else { "optional" };
            format!("`{}` - {} ({presence})", option.name, option.description)
        })
        .collect();
    Some(lines.join("\n"))
}

fn help_detail(descriptor: &CommandDescriptor) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(format!("📖 Help: /{}", descriptor.name))
        .description(descriptor.description)
        .colour(EMBED_COLOUR)
        .field("Usage", format!("`{}`", usage(descriptor)), false);
    if let Some(options) = option_lines(descriptor) {
        embed = embed.field("Options", options, false);
    }
    embed.timestamp(Timestamp::now())
}

// userinfo

/// `/userinfo [user]`
#[must_use]
pub fn userinfo() -> CommandDescriptor {
    CommandDescriptor::new("userinfo", "Shows information about a user", userinfo_action).option(
        OptionSpec::new(
            "user",
            "The user to get information about",
            OptionKind::User,
        ),
    )
}

fn userinfo_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_userinfo(inv))
}

/// Guild membership details of the inspected user.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberView {
    /// `(position, id)` for every role except @everyone
    roles: Vec<(u16, RoleId)>,
    joined_at: Option<i64>,
    boosting_since: Option<i64>,
    permissions: Option<Permissions>,
}

/// Membership of `target` as delivered with the interaction.
fn member_view(inv: Invocation<'_>, target: &User) -> Option<MemberView> {
    let (roles, joined_at, premium_since, permissions) = if target.id == inv.user().id {
        let member = inv.interaction.member.as_deref()?;
        (
            member.roles.clone(),
            member.joined_at,
            member.premium_since,
            member.permissions,
        )
    } else {
        let member = inv.interaction.data.resolved.members.get(&target.id)?;
        (
            member.roles.clone(),
            member.joined_at,
            member.premium_since,
            member.permissions,
        )
    };

    let positioned = inv
        .guild_id()
        .and_then(|id| {
            inv.ctx.cache.guild(id).map(|guild| {
                roles
                    .iter()
                    .map(|role| (guild.roles.get(role).map_or(0, |r| r.position), *role))
                    .collect()
            })
        })
        .unwrap_or_else(|| roles.iter().map(|role| (0, *role)).collect());

    Some(MemberView {
        roles: positioned,
        joined_at: joined_at.map(|ts| ts.unix_timestamp()),
        boosting_since: premium_since.map(|ts| ts.unix_timestamp()),
        permissions,
    })
}

/// Highest roles first, at most [`MAX_LISTED_ROLES`], `...` when cut.
fn role_summary(mut roles: Vec<(u16, RoleId)>) -> String {
    if roles.is_empty() {
        return "None".to_string();
    }
    roles.sort_by(|a, b| b.0.cmp(&a.0));
    let mut listed: Vec<String> = roles
        .iter()
        .take(MAX_LISTED_ROLES)
        .map(|(_, id)| format!("<@&{id}>"))
        .collect();
    if roles.len() > MAX_LISTED_ROLES {
        listed.push("...".to_string());
    }
    listed.join(" ")
}

fn key_permissions(permissions: Permissions) -> String {
    if permissions.administrator() {
        return "Administrator (All Permissions)".to_string();
    }
    let held: Vec<&str> = KEY_PERMISSIONS
        .iter()
        .filter(|(flag, _)| permissions.contains(*flag))
        .map(|(_, label)| *label)
        .collect();
    if held.is_empty() {
        "None".to_string()
    } else {
        held.join(", ")
    }
}

fn user_embed(target: &User, member: Option<MemberView>, requester: &User) -> CreateEmbed {
    let created = format::snowflake_datetime(target.id.get()).timestamp();
    let joined = member
        .as_ref()
        .and_then(|m| m.joined_at)
        .map_or_else(|| "Not in this server".to_string(), format::relative_timestamp);

    let mut embed = CreateEmbed::new()
        .title("👤 User Information")
        .colour(EMBED_COLOUR)
        .thumbnail(target.face())
        .field(
            "📝 Basic Info",
            format!(
                "**Username:** {}\n**Display Name:** {}\n**ID:** {}\n**Bot:** {}",
                target.name,
                target.global_name.as_deref().unwrap_or(&target.name),
                target.id,
                if target.bot { "Yes" } else { "No" }
            ),
            true,
        )
        .field(
            "📅 Dates",
            format!(
                "**Account Created:** {}\n**Joined Server:** {joined}",
                format::relative_timestamp(created)
            ),
            true,
        );

    if let Some(member) = member {
        embed = embed.field(
            format!("🎭 Roles ({})", member.roles.len()),
            role_summary(member.roles),
            false,
        );
        if let Some(permissions) = member.permissions {
            embed = embed.field("⚡ Key Permissions", key_permissions(permissions), false);
        }
        if let Some(since) = member.boosting_since {
            embed = embed.field(
                "💎 Server Booster",
                format!("Since {}", format::relative_timestamp(since)),
                true,
            );
        }
    }

    embed
        .footer(
            CreateEmbedFooter::new(format!("Requested by {}", requester.name))
                .icon_url(requester.face()),
        )
        .timestamp(Timestamp::now())
}

async fn run_userinfo(inv: Invocation<'_>) -> Result<()> {
    let options = inv.options();
    let target = user_option(&options, "user").unwrap_or_else(|| inv.user());
    let member = member_view(inv, target);

    inv.responder
        .reply_embed(user_embed(target, member, inv.user()))
        .await
}

// serverinfo

/// `/serverinfo`
#[must_use]
pub fn serverinfo() -> CommandDescriptor {
    CommandDescriptor::new(
        "serverinfo",
        "Shows information about the server",
        serverinfo_action,
    )
}

fn serverinfo_action(inv: Invocation<'_>) -> BoxFuture<'_, Result<()>> {
    Box::pin(run_serverinfo(inv))
}

/// Everything `/serverinfo` shows, copied out of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ServerSnapshot {
    name: String,
    id: u64,
    owner_id: UserId,
    icon: Option<String>,
    banner: Option<String>,
    description: Option<String>,
    verification: &'static str,
    members: u64,
    bots: usize,
    online: usize,
    text_channels: usize,
    voice_channels: usize,
    categories: usize,
    threads: usize,
    roles: usize,
    emojis: usize,
    stickers: usize,
    boost_tier: u8,
    boosts: u64,
    features: Vec<String>,
}

const fn verification_name(level: VerificationLevel) -> &'static str {
    match level {
        VerificationLevel::None => "None",
        VerificationLevel::Low => "Low",
        VerificationLevel::Medium => "Medium",
        VerificationLevel::High => "High",
        VerificationLevel::Higher => "Very High",
        _ => "Unknown",
    }
}

const fn boost_tier(tier: PremiumTier) -> u8 {
    match tier {
        PremiumTier::Tier1 => 1,
        PremiumTier::Tier2 => 2,
        PremiumTier::Tier3 => 3,
        _ => 0,
    }
}

fn server_snapshot(guild: &Guild) -> ServerSnapshot {
    let count_kind =
        |kind: ChannelType| guild.channels.values().filter(|c| c.kind == kind).count();
    ServerSnapshot {
        name: guild.name.clone(),
        id: guild.id.get(),
        owner_id: guild.owner_id,
        icon: guild.icon_url(),
        banner: guild.banner_url(),
        description: guild.description.clone(),
        verification: verification_name(guild.verification_level),
        members: guild.member_count,
        bots: guild.members.values().filter(|m| m.user.bot).count(),
        online: guild
            .presences
            .values()
            .filter(|p| p.status != OnlineStatus::Offline)
            .count(),
        text_channels: count_kind(ChannelType::Text),
        voice_channels: count_kind(ChannelType::Voice),
        categories: count_kind(ChannelType::Category),
        threads: guild.threads.len(),
        // @everyone is stored as a role with the guild's id
        roles: guild.roles.len().saturating_sub(1),
        emojis: guild.emojis.len(),
        stickers: guild.stickers.len(),
        boost_tier: boost_tier(guild.premium_tier),
        boosts: guild.premium_subscription_count.unwrap_or(0),
        features: guild.features.clone(),
    }
}

fn server_embed(server: &ServerSnapshot, requester: &User) -> CreateEmbed {
    let created = format::snowflake_datetime(server.id).timestamp();
    let humans = usize::try_from(server.members)
        .unwrap_or(usize::MAX)
        .saturating_sub(server.bots);

    let mut embed = CreateEmbed::new()
        .title(format!("🏠 {}", server.name))
        .colour(EMBED_COLOUR)
        .field(
            "📊 General Information",
            format!(
                "**Owner:** <@{}>\n**Created:** {}\n**Server ID:** {}\n**Verification Level:** {}",
                server.owner_id,
                format::relative_timestamp(created),
                server.id,
                server.verification
            ),
            false,
        )
        .field(
            "👥 Members",
            format!(
                "**Total:** {}\n**Humans:** {humans}\n**Bots:** {}\n**Online:** {}",
                server.members, server.bots, server.online
            ),
            true,
        )
        .field(
            "📺 Channels",
            format!(
                "**Text:** {}\n**Voice:** {}\n**Categories:** {}\n**Threads:** {}",
                server.text_channels, server.voice_channels, server.categories, server.threads
            ),
            true,
        )
        .field(
            "🎭 Other",
            format!(
                "**Roles:** {}\n**Emojis:** {}\n**Stickers:** {}",
                server.roles, server.emojis, server.stickers
            ),
            true,
        );

    if let Some(icon) = &server.icon {
        embed = embed.thumbnail(icon);
    }
    if let Some(description) = &server.description {
        embed = embed.description(description);
    }
    if server.boosts > 0 {
        embed = embed.field(
            "💎 Server Boost",
            format!(
                "**Level:** {}\n**Boosts:** {}",
                server.boost_tier, server.boosts
            ),
            true,
        );
    }
    if !server.features.is_empty() {
        let features: Vec<String> = server
            .features
            .iter()
            .map(|f| format::prettify_feature(f))
            .collect();
        embed = embed.field("✨ Features", features.join(", "), false);
    }
    if let Some(banner) = &server.banner {
        embed = embed.image(banner);
    }

    embed
        .footer(
            CreateEmbedFooter::new(format!("Requested by {}", requester.name))
                .icon_url(requester.face()),
        )
        .timestamp(Timestamp::now())
}

async fn run_serverinfo(inv: Invocation<'_>) -> Result<()> {
    let Some(guild_id) = inv.guild_id() else {
        return inv
            .responder
            .reply_ephemeral("❌ This command can only be used in a server.")
            .await;
    };
    let snapshot = inv.ctx.cache.guild(guild_id).map(|guild| server_snapshot(&guild));
    let Some(snapshot) = snapshot else {
        return inv
            .responder
            .reply_ephemeral("❌ Server information is not available yet. Please try again shortly.")
            .await;
    };

    inv.responder
        .reply_embed(server_embed(&snapshot, inv.user()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::commands;
    use serde_json::Value;

    fn registry() -> CommandRegistry<CommandDescriptor> {
        commands::all().into_iter().collect()
    }

    fn requester() -> User {
        let mut user = User::default();
        user.id = UserId::new(100_000_000_000_000_001);
        user.name = "moderator".to_string();
        user
    }

    fn embed_json(embed: CreateEmbed) -> Value {
        serde_json::to_value(embed).unwrap_or(Value::Null)
    }

    fn field<'a>(embed: &'a Value, name: &str) -> Option<&'a Value> {
        embed["fields"]
            .as_array()?
            .iter()
            .find(|f| f["name"] == name)
            .map(|f| &f["value"])
    }

    #[test]
    fn test_overview_groups_by_category() {
        let (general, moderation) = overview_lines(&registry());
        assert_eq!(general.len(), 5);
        assert_eq!(moderation.len(), 3);
        assert_eq!(general[0], "`/ping` - Replies with Pong! and shows bot latency");
        assert!(moderation.iter().all(|line| !line.starts_with("`/ping`")));
    }

    #[test]
    fn test_overview_footer_counts_commands() {
        let embed = embed_json(help_overview(&registry()));
        assert_eq!(embed["title"], "📚 Available Commands");
        assert_eq!(embed["footer"]["text"], "Total commands: 8");
    }

    #[test]
    fn test_detail_lists_usage_and_options() {
        let registry = registry();
        let Some(clear) = registry.lookup("clear") else {
            panic!("clear is registered");
        };
        assert_eq!(usage(clear), "/clear <amount> [user]");

        let options = option_lines(clear).unwrap_or_default();
        assert!(options.starts_with("`amount` - "));
        assert!(options.contains("(required)"));
        assert!(options.contains("(optional)"));

        let Some(ping) = registry.lookup("ping") else {
            panic!("ping is registered");
        };
        assert_eq!(option_lines(ping), None);
        assert_eq!(embed_json(help_detail(ping))["title"], "📖 Help: /ping");
    }

    #[test]
    fn test_role_summary_sorts_and_truncates() {
        assert_eq!(role_summary(Vec::new()), "None");

        let few = vec![(1, RoleId::new(11)), (5, RoleId::new(55)), (3, RoleId::new(33))];
        assert_eq!(role_summary(few), "<@&55> <@&33> <@&11>");

        let many: Vec<(u16, RoleId)> = (1..=12).map(|p| (p, RoleId::new(u64::from(p)))).collect();
        let summary = role_summary(many);
        assert!(summary.starts_with("<@&12> <@&11>"));
        assert!(summary.ends_with(" ..."));
        assert!(!summary.contains("<@&2>"));
    }

    #[test]
    fn test_key_permissions() {
        assert_eq!(
            key_permissions(Permissions::ADMINISTRATOR | Permissions::KICK_MEMBERS),
            "Administrator (All Permissions)"
        );
        assert_eq!(
            key_permissions(Permissions::BAN_MEMBERS | Permissions::MANAGE_GUILD),
            "Manage Server, Ban Members"
        );
        assert_eq!(key_permissions(Permissions::SEND_MESSAGES), "None");
    }

    #[test]
    fn test_user_embed_outside_guild() {
        let target = requester();
        let embed = embed_json(user_embed(&target, None, &target));

        assert_eq!(embed["title"], "👤 User Information");
        let dates = field(&embed, "📅 Dates").and_then(Value::as_str).unwrap_or_default();
        assert!(dates.contains("Not in this server"));
        assert!(field(&embed, "⚡ Key Permissions").is_none());
    }

    #[test]
    fn test_server_embed_derives_humans_and_skips_boosts() {
        let server = ServerSnapshot {
            name: "Test Guild".to_string(),
            id: 300_000_000_000_000_001,
            owner_id: UserId::new(100_000_000_000_000_001),
            icon: None,
            banner: None,
            description: None,
            verification: "Medium",
            members: 10,
            bots: 3,
            online: 4,
            text_channels: 5,
            voice_channels: 2,
            categories: 1,
            threads: 0,
            roles: 6,
            emojis: 0,
            stickers: 0,
            boost_tier: 0,
            boosts: 0,
            features: vec!["ANIMATED_ICON".to_string()],
        };
        let embed = embed_json(server_embed(&server, &requester()));

        assert_eq!(embed["title"], "🏠 Test Guild");
        let members = field(&embed, "👥 Members").and_then(Value::as_str).unwrap_or_default();
        assert!(members.contains("**Humans:** 7"));
        assert!(field(&embed, "💎 Server Boost").is_none());
        assert_eq!(
            field(&embed, "✨ Features").and_then(Value::as_str),
            Some("Animated icon")
        );
    }

    #[test]
    fn test_statistics_text() {
        let text = statistics_text(BotStatistics {
            guilds: 2,
            users: 40,
            channels: 12,
        });
        assert_eq!(text, "**Servers:** 2\n**Users:** 40\n**Channels:** 12");
    }
}
