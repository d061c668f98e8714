//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the persisted users, guilds, their membership junction
//! and the migration bookkeeping table.

pub mod guild;
pub mod schema_migration;
pub mod user;
pub mod user_guild;

// Re-export specific types to avoid conflicts
pub use guild::{Column as GuildColumn, Entity as Guild, Model as GuildModel};
pub use schema_migration::{
    Column as SchemaMigrationColumn, Entity as SchemaMigration, Model as SchemaMigrationModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_guild::{Column as UserGuildColumn, Entity as UserGuild, Model as UserGuildModel};
