//! Membership junction between users and guilds.
//!
//! Deleting either side cascades to the membership rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_guilds")]
pub struct Model {
    /// Member's user id
    #[sea_orm(primary_key, auto_increment = false, indexed)]
    pub user_id: String,
    /// Guild id
    #[sea_orm(primary_key, auto_increment = false, indexed)]
    pub guild_id: String,
    /// Role ids as a JSON array
    #[sea_orm(column_type = "Text", default_value = "[]")]
    pub roles: String,
    /// When the member joined the guild
    #[sea_orm(indexed)]
    pub joined_at: DateTimeUtc,
}

/// Defines relationships between the membership and its two sides
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each membership belongs to one guild
    #[sea_orm(
        belongs_to = "super::guild::Entity",
        from = "Column::GuildId",
        to = "super::guild::Column::Id",
        on_delete = "Cascade"
    )]
    Guild,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::guild::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guild.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
