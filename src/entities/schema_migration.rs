//! Bookkeeping for the strict migration runner: one row per applied step.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Applied migration record
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schema_migrations")]
pub struct Model {
    /// Step version, ascending
    #[sea_orm(primary_key, auto_increment = false)]
    pub version: i32,
    /// Step name, e.g. `create_users_table`
    pub name: String,
    /// When the step ran
    pub applied_at: DateTimeUtc,
}

/// `SchemaMigration` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
