//! User-guild membership records.

use crate::{
    entities::{UserGuild, user_guild},
    errors::Result,
    logging,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Records (or refreshes) that `user_id` is a member of `guild_id`.
///
/// Both the user and the guild row must exist; the foreign keys reject orphans.
pub async fn record_membership<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    guild_id: &str,
    role_ids: &[String],
    joined_at: DateTime<Utc>,
) -> Result<user_guild::Model> {
    let roles = serde_json::to_string(role_ids)?;
    let existing = UserGuild::find_by_id((user_id.to_string(), guild_id.to_string()))
        .one(db)
        .await?;

    let saved = if let Some(existing) = existing {
        let mut active: user_guild::ActiveModel = existing.into();
        active.roles = Set(roles);
        active.joined_at = Set(joined_at);
        active.update(db).await?
    } else {
        user_guild::ActiveModel {
            user_id: Set(user_id.to_string()),
            guild_id: Set(guild_id.to_string()),
            roles: Set(roles),
            joined_at: Set(joined_at),
        }
        .insert(db)
        .await?
    };

    logging::database("upsert", "user_guilds", &format!("{user_id}:{guild_id}"));
    Ok(saved)
}

/// Guild memberships of a user, oldest join first.
pub async fn memberships_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<user_guild::Model>> {
    UserGuild::find()
        .filter(user_guild::Column::UserId.eq(user_id))
        .order_by_asc(user_guild::Column::JoinedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Role ids stored on a membership row.
#[must_use]
pub fn role_ids(membership: &user_guild::Model) -> Vec<String> {
    serde_json::from_str(&membership.roles).unwrap_or_default()
}
