//! User entity - A Discord user the bot has observed joining a guild.
//!
//! Rows are created on first observation and refreshed on every later one.
//! They are never deleted by the bot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Discord user id (snowflake as text)
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(20))")]
    pub id: String,
    /// Username at the last observation
    #[sea_orm(column_type = "String(StringLen::N(32))", indexed)]
    pub username: String,
    /// Legacy discriminator, `0` for migrated accounts
    #[sea_orm(column_type = "String(StringLen::N(4))")]
    pub discriminator: String,
    /// First observation
    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    /// Most recent observation
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user belongs to many guilds through `user_guilds`
    #[sea_orm(has_many = "super::user_guild::Entity")]
    Memberships,
}

impl Related<super::user_guild::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
