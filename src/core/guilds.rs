//! Guild persistence - upsert, lookups and the JSON settings blob.
//!
//! Rows outlive the bot's membership in a guild: leaving a guild does not delete
//! anything, so a re-added bot finds its previous settings.

use crate::{
    entities::{Guild, guild},
    errors::{Error, Result},
    logging,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

/// Free-form per-guild settings.
pub type GuildSettings = Map<String, Value>;

/// Finds a guild by id.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<guild::Model>> {
    Guild::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Guilds whose name contains `fragment`, alphabetically.
pub async fn find_by_name<C: ConnectionTrait>(db: &C, fragment: &str) -> Result<Vec<guild::Model>> {
    Guild::find()
        .filter(guild::Column::Name.contains(fragment))
        .order_by_asc(guild::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a row exists for `id`.
pub async fn exists<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool> {
    Ok(find_by_id(db, id).await?.is_some())
}

/// Creates the guild on first observation, refreshes name and settings afterwards.
///
/// `None` settings store an empty map, matching a fresh guild.
pub async fn create_or_update_guild<C: ConnectionTrait>(
    db: &C,
    id: &str,
    name: &str,
    settings: Option<&GuildSettings>,
) -> Result<guild::Model> {
    create_or_update_guild_at(db, id, name, settings, Utc::now()).await
}

/// [`create_or_update_guild`] with an explicit clock reading.
#[instrument(skip(db, settings))]
pub async fn create_or_update_guild_at<C: ConnectionTrait>(
    db: &C,
    id: &str,
    name: &str,
    settings: Option<&GuildSettings>,
    now: DateTime<Utc>,
) -> Result<guild::Model> {
    if id.trim().is_empty() {
        return Err(Error::Validation {
            field: "guild id".to_string(),
            message: "cannot be empty".to_string(),
        });
    }

    let settings_json = serde_json::to_string(&settings.cloned().unwrap_or_default())?;

    let saved = if let Some(existing) = find_by_id(db, id).await? {
        let mut active: guild::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.settings = Set(settings_json);
        active.updated_at = Set(now);
        let updated = active.update(db).await?;
        logging::database("update", "guilds", id);
        updated
    } else {
        let inserted = guild::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            prefix: Set(crate::config::app::DEFAULT_PREFIX.to_string()),
            settings: Set(settings_json),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        logging::database("insert", "guilds", id);
        inserted
    };

    Ok(saved)
}

/// Replaces the settings blob of an existing guild.
pub async fn update_settings<C: ConnectionTrait>(
    db: &C,
    id: &str,
    settings: &GuildSettings,
) -> Result<guild::Model> {
    let existing = find_by_id(db, id).await?.ok_or_else(|| Error::NotFound {
        entity: "guild",
        id: id.to_string(),
    })?;

    let mut active: guild::ActiveModel = existing.into();
    active.settings = Set(serde_json::to_string(settings)?);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    logging::database("update_settings", "guilds", id);
    Ok(updated)
}

/// Reads the settings blob. A blob that does not parse as an object reads as empty.
pub async fn get_settings<C: ConnectionTrait>(db: &C, id: &str) -> Result<GuildSettings> {
    let guild = find_by_id(db, id).await?.ok_or_else(|| Error::NotFound {
        entity: "guild",
        id: id.to_string(),
    })?;

    Ok(parse_settings(&guild.settings).unwrap_or_else(|| {
        warn!(guild_id = %id, "Stored guild settings are not a JSON object");
        GuildSettings::new()
    }))
}

fn parse_settings(raw: &str) -> Option<GuildSettings> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Removes a guild. Memberships cascade.
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool> {
    let result = Guild::delete_by_id(id).exec(db).await?;
    logging::database("delete", "guilds", id);
    Ok(result.rows_affected > 0)
}
