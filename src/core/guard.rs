//! Authorization guard shared by the moderation commands.
//!
//! The guard is a pure function over a snapshot of the facts a moderation action
//! depends on. The bot layer gathers those facts from the Discord cache and the
//! interaction payload, then asks [`check`] whether the action may proceed. Checks
//! run in a fixed order and the first failing rule wins.

use poise::serenity_prelude::UserId;
use std::fmt;

/// The privileged action being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    /// Remove a member from the guild
    Kick,
    /// Ban a user from the guild
    Ban,
}

impl ModerationAction {
    /// Verb used in user-facing messages (`kick`, `ban`).
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Ban => "ban",
        }
    }
}

/// Hierarchy facts about the target, present only when the target is a guild member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMembership {
    /// Position of the target's highest role (0 for @everyone only)
    pub highest_rank: u16,
    /// Whether the platform reports the action as possible on this member
    pub actionable: bool,
}

/// Everything the guard needs to decide, captured before any await point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardFacts {
    /// Whether the interaction happened inside a guild
    pub in_guild: bool,
    /// The invoking user
    pub actor_id: UserId,
    /// The user being moderated
    pub target_id: UserId,
    /// The bot's own user id
    pub bot_id: UserId,
    /// Owner of the guild the interaction came from
    pub owner_id: Option<UserId>,
    /// Position of the actor's highest role
    pub actor_rank: u16,
    /// Position of the bot's highest role
    pub bot_rank: u16,
    /// `None` when the target is not a member of the guild
    pub target: Option<TargetMembership>,
}

/// A rule the guard refused the action on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// Used outside of a guild
    NotInGuild,
    /// Target is not a member and the action requires membership
    TargetNotMember,
    /// Actor targeted themself
    SelfTarget,
    /// Actor targeted the bot
    BotTarget,
    /// Target owns the guild
    GuildOwner,
    /// Target ranks at or above the actor
    ActorHierarchy,
    /// Target ranks at or above the bot
    BotHierarchy,
    /// The platform refuses the action on this target
    NotActionable,
}

impl GuardRejection {
    /// The ephemeral message shown to the actor for this rejection.
    #[must_use]
    pub fn message(self, action: ModerationAction) -> String {
        let verb = action.verb();
        match self {
            Self::NotInGuild => "❌ This command can only be used in a server.".to_string(),
            Self::TargetNotMember => "❌ User is not in this server.".to_string(),
            Self::SelfTarget => format!("❌ You cannot {verb} yourself."),
            Self::BotTarget => format!("❌ I cannot {verb} myself."),
            Self::GuildOwner => format!("❌ You cannot {verb} the server owner."),
            Self::ActorHierarchy => {
                format!("❌ You cannot {verb} a user with equal or higher role than you.")
            }
            Self::BotHierarchy => {
                format!("❌ I cannot {verb} a user with equal or higher role than me.")
            }
            Self::NotActionable => {
                format!("❌ I cannot {verb} this user. They may have higher permissions.")
            }
        }
    }
}

impl fmt::Display for GuardRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self {
            Self::NotInGuild => "not in guild",
            Self::TargetNotMember => "target not a member",
            Self::SelfTarget => "self target",
            Self::BotTarget => "bot target",
            Self::GuildOwner => "guild owner",
            Self::ActorHierarchy => "actor hierarchy",
            Self::BotHierarchy => "bot hierarchy",
            Self::NotActionable => "not actionable",
        };
        f.write_str(rule)
    }
}

/// Runs the layered guard.
///
/// Kicks require the target to be a member. Bans may target users outside the
/// guild, in which case the hierarchy and actionable checks have nothing to look
/// at and are skipped.
pub fn check(action: ModerationAction, facts: &GuardFacts) -> Result<(), GuardRejection> {
    if !facts.in_guild {
        return Err(GuardRejection::NotInGuild);
    }
    if action == ModerationAction::Kick && facts.target.is_none() {
        return Err(GuardRejection::TargetNotMember);
    }
    if facts.target_id == facts.actor_id {
        return Err(GuardRejection::SelfTarget);
    }
    if facts.target_id == facts.bot_id {
        return Err(GuardRejection::BotTarget);
    }
    if facts.owner_id == Some(facts.target_id) {
        return Err(GuardRejection::GuildOwner);
    }

    let Some(target) = facts.target else {
        return Ok(());
    };
    if target.highest_rank >= facts.actor_rank {
        return Err(GuardRejection::ActorHierarchy);
    }
    if target.highest_rank >= facts.bot_rank {
        return Err(GuardRejection::BotHierarchy);
    }
    if !target.actionable {
        return Err(GuardRejection::NotActionable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> UserId {
        UserId::new(100_000_000_000_000_001)
    }
    fn target() -> UserId {
        UserId::new(100_000_000_000_000_002)
    }
    fn bot() -> UserId {
        UserId::new(100_000_000_000_000_003)
    }
    fn owner() -> UserId {
        UserId::new(100_000_000_000_000_004)
    }

    fn passing_facts() -> GuardFacts {
        GuardFacts {
            in_guild: true,
            actor_id: actor(),
            target_id: target(),
            bot_id: bot(),
            owner_id: Some(owner()),
            actor_rank: 10,
            bot_rank: 20,
            target: Some(TargetMembership {
                highest_rank: 5,
                actionable: true,
            }),
        }
    }

    #[test]
    fn test_all_checks_pass() {
        assert_eq!(check(ModerationAction::Kick, &passing_facts()), Ok(()));
        assert_eq!(check(ModerationAction::Ban, &passing_facts()), Ok(()));
    }

    #[test]
    fn test_outside_guild_rejected_first() {
        let facts = GuardFacts {
            in_guild: false,
            target_id: actor(),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Ban, &facts),
            Err(GuardRejection::NotInGuild)
        );
    }

    #[test]
    fn test_self_and_bot_targets() {
        let self_target = GuardFacts {
            target_id: actor(),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Kick, &self_target),
            Err(GuardRejection::SelfTarget)
        );

        let bot_target = GuardFacts {
            target_id: bot(),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Kick, &bot_target),
            Err(GuardRejection::BotTarget)
        );
    }

    #[test]
    fn test_owner_reported_before_equal_rank() {
        // Owner AND equal rank: the owner rule comes first.
        let facts = GuardFacts {
            target_id: owner(),
            owner_id: Some(owner()),
            target: Some(TargetMembership {
                highest_rank: 10,
                actionable: true,
            }),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Kick, &facts),
            Err(GuardRejection::GuildOwner)
        );
    }

    #[test]
    fn test_equal_rank_is_protected() {
        let facts = GuardFacts {
            target: Some(TargetMembership {
                highest_rank: 10,
                actionable: true,
            }),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Ban, &facts),
            Err(GuardRejection::ActorHierarchy)
        );
    }

    #[test]
    fn test_bot_hierarchy_after_actor_hierarchy() {
        let facts = GuardFacts {
            actor_rank: 30,
            bot_rank: 8,
            target: Some(TargetMembership {
                highest_rank: 8,
                actionable: false,
            }),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Kick, &facts),
            Err(GuardRejection::BotHierarchy)
        );
    }

    #[test]
    fn test_not_actionable_is_last() {
        let facts = GuardFacts {
            target: Some(TargetMembership {
                highest_rank: 1,
                actionable: false,
            }),
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Ban, &facts),
            Err(GuardRejection::NotActionable)
        );
    }

    #[test]
    fn test_non_member_target() {
        let facts = GuardFacts {
            target: None,
            ..passing_facts()
        };
        assert_eq!(
            check(ModerationAction::Kick, &facts),
            Err(GuardRejection::TargetNotMember)
        );
        assert_eq!(check(ModerationAction::Ban, &facts), Ok(()));
    }

    #[test]
    fn test_messages_name_the_action() {
        assert_eq!(
            GuardRejection::SelfTarget.message(ModerationAction::Kick),
            "❌ You cannot kick yourself."
        );
        assert_eq!(
            GuardRejection::BotHierarchy.message(ModerationAction::Ban),
            "❌ I cannot ban a user with equal or higher role than me."
        );
    }
}
