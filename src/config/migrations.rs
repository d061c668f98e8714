//! Ordered schema migrations.
//!
//! Each step creates one table (plus its indexes) from an entity definition. Steps run in
//! ascending version order and are recorded in `schema_migrations`.
//!
//! Two modes share the same steps:
//! * [`Mode::Bootstrap`] tolerates existing tables and indexes (`IF NOT EXISTS`).
//! * [`Mode::Strict`] issues plain `CREATE` statements inside a transaction per step, so a
//!   table that exists without a matching record fails the run instead of being skipped.

use crate::{
    entities::{Guild, SchemaMigration, User, UserGuild, schema_migration},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{
    DatabaseConnection, DbBackend, QueryOrder, Schema, Set, Statement, TransactionTrait,
    prelude::*,
};
use std::collections::HashSet;
use tracing::{info, instrument};

/// How existing objects are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Skip tables and indexes that already exist
    Bootstrap,
    /// Fail on anything that already exists
    Strict,
}

/// One forward-only schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Ascending step number
    pub version: i32,
    /// Human readable step name
    pub name: &'static str,
    statements: fn(DbBackend, Mode) -> Vec<Statement>,
}

impl Migration {
    /// SQL for this step on `backend`.
    #[must_use]
    pub fn statements(&self, backend: DbBackend, mode: Mode) -> Vec<Statement> {
        (self.statements)(backend, mode)
    }
}

/// Every step, in application order.
pub const MIGRATIONS: [Migration; 3] = [
    Migration {
        version: 1,
        name: "create_users_table",
        statements: users_table,
    },
    Migration {
        version: 2,
        name: "create_guilds_table",
        statements: guilds_table,
    },
    Migration {
        version: 3,
        name: "create_user_guilds_table",
        statements: user_guilds_table,
    },
];

fn users_table(backend: DbBackend, mode: Mode) -> Vec<Statement> {
    entity_statements(backend, User, mode)
}

fn guilds_table(backend: DbBackend, mode: Mode) -> Vec<Statement> {
    entity_statements(backend, Guild, mode)
}

// Foreign keys to both sides, cascading on delete.
fn user_guilds_table(backend: DbBackend, mode: Mode) -> Vec<Statement> {
    entity_statements(backend, UserGuild, mode)
}

fn entity_statements<E: EntityTrait>(backend: DbBackend, entity: E, mode: Mode) -> Vec<Statement> {
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    if mode == Mode::Bootstrap {
        table.if_not_exists();
    }

    let mut statements = vec![backend.build(&table)];
    for mut index in schema.create_index_from_entity(entity) {
        if mode == Mode::Bootstrap {
            index.if_not_exists();
        }
        statements.push(backend.build(&index));
    }
    statements
}

/// Creates the `schema_migrations` table when missing.
pub async fn ensure_bookkeeping<C: ConnectionTrait>(db: &C) -> Result<()> {
    let backend = db.get_database_backend();
    let mut table = Schema::new(backend).create_table_from_entity(SchemaMigration);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;
    Ok(())
}

/// Runs the statements of one step without recording it.
pub async fn execute<C: ConnectionTrait>(db: &C, migration: &Migration, mode: Mode) -> Result<()> {
    for statement in migration.statements(db.get_database_backend(), mode) {
        db.execute(statement).await?;
    }
    Ok(())
}

/// Records a step as applied. Already recorded steps are left untouched.
pub async fn record<C: ConnectionTrait>(db: &C, migration: &Migration) -> Result<()> {
    if SchemaMigration::find_by_id(migration.version)
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    schema_migration::ActiveModel {
        version: Set(migration.version),
        name: Set(migration.name.to_string()),
        applied_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Versions already recorded, ascending.
pub async fn applied_versions<C: ConnectionTrait>(db: &C) -> Result<Vec<i32>> {
    Ok(SchemaMigration::find()
        .order_by_asc(schema_migration::Column::Version)
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.version)
        .collect())
}

/// Steps that have not been recorded yet, in application order.
pub async fn pending<C: ConnectionTrait>(db: &C) -> Result<Vec<Migration>> {
    ensure_bookkeeping(db).await?;
    let applied: HashSet<i32> = applied_versions(db).await?.into_iter().collect();
    Ok(MIGRATIONS
        .into_iter()
        .filter(|migration| !applied.contains(&migration.version))
        .collect())
}

/// Applies every pending step in order, one transaction per step.
///
/// Stops at the first failure; earlier steps stay applied.
#[instrument(skip(db))]
pub async fn run_migrations(db: &DatabaseConnection) -> Result<Vec<&'static str>> {
    let mut applied = Vec::new();

    for migration in pending(db).await? {
        info!(version = migration.version, name = migration.name, "Applying migration");
        let txn = db.begin().await?;
        execute(&txn, &migration, Mode::Strict).await?;
        record(&txn, &migration).await?;
        txn.commit().await?;
        applied.push(migration.name);
    }

    if applied.is_empty() {
        info!("Database schema is up to date");
    } else {
        info!(count = applied.len(), "Migrations applied");
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use sea_orm::Database;

    #[test]
    fn test_versions_ascend() {
        let versions: Vec<i32> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_modes_differ_only_in_guards() {
        let bootstrap = MIGRATIONS[0].statements(DbBackend::Sqlite, Mode::Bootstrap);
        let strict = MIGRATIONS[0].statements(DbBackend::Sqlite, Mode::Strict);

        assert_eq!(bootstrap.len(), strict.len());
        assert!(bootstrap[0].sql.contains("IF NOT EXISTS"));
        assert!(!strict[0].sql.contains("IF NOT EXISTS"));
    }

    #[tokio::test]
    async fn test_run_migrations_applies_in_order_once() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;

        let first = run_migrations(&db).await?;
        assert_eq!(
            first,
            vec![
                "create_users_table",
                "create_guilds_table",
                "create_user_guilds_table"
            ]
        );
        assert_eq!(applied_versions(&db).await?, vec![1, 2, 3]);

        assert!(run_migrations(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_strict_run_rejects_unrecorded_table() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        execute(&db, &MIGRATIONS[0], Mode::Bootstrap).await?;

        let result = run_migrations(&db).await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert!(applied_versions(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_bootstrap_then_strict_is_noop() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        crate::config::database::create_tables(&db).await?;

        assert!(pending(&db).await?.is_empty());
        assert!(run_migrations(&db).await?.is_empty());
        Ok(())
    }
}
