//! Guild entity - A server the bot has been added to.
//!
//! `settings` holds a JSON object (owner, member count, join time and any future
//! per-guild options). `prefix` is a leftover from prefix commands and is not read
//! by the slash command handlers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guilds")]
pub struct Model {
    /// Discord guild id (snowflake as text)
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(20))")]
    pub id: String,
    /// Guild name at the last observation
    #[sea_orm(column_type = "String(StringLen::N(100))", indexed)]
    pub name: String,
    /// Legacy command prefix
    #[sea_orm(column_type = "String(StringLen::N(5))", default_value = "!")]
    pub prefix: String,
    /// Serialized settings map
    #[sea_orm(column_type = "Text", default_value = "{}")]
    pub settings: String,
    /// When the bot first saw the guild
    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    /// Most recent observation
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Guild and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One guild has many members through `user_guilds`
    #[sea_orm(has_many = "super::user_guild::Entity")]
    Memberships,
}

impl Related<super::user_guild::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
