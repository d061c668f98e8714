//! User persistence - upsert and lookups for observed Discord users.
//!
//! Upserts look the row up by primary key first: an existing row gets its mutable
//! fields and `updated_at` refreshed, a missing one is inserted with both timestamps
//! set to now. Calling the upsert twice with the same arguments leaves one row.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
    logging,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::instrument;

/// Finds a user by id.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Users whose name contains `fragment`, alphabetically.
pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    fragment: &str,
) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Username.contains(fragment))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a row exists for `id`.
pub async fn exists<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool> {
    Ok(find_by_id(db, id).await?.is_some())
}

/// Creates the user on first observation, refreshes it afterwards.
pub async fn create_or_update_user<C: ConnectionTrait>(
    db: &C,
    id: &str,
    username: &str,
    discriminator: &str,
) -> Result<user::Model> {
    create_or_update_user_at(db, id, username, discriminator, Utc::now()).await
}

/// [`create_or_update_user`] with an explicit clock reading.
#[instrument(skip(db))]
pub async fn create_or_update_user_at<C: ConnectionTrait>(
    db: &C,
    id: &str,
    username: &str,
    discriminator: &str,
    now: DateTime<Utc>,
) -> Result<user::Model> {
    if id.trim().is_empty() {
        return Err(Error::Validation {
            field: "user id".to_string(),
            message: "cannot be empty".to_string(),
        });
    }

    let saved = if let Some(existing) = find_by_id(db, id).await? {
        let mut active: user::ActiveModel = existing.into();
        active.username = Set(username.to_string());
        active.discriminator = Set(discriminator.to_string());
        active.updated_at = Set(now);
        let updated = active.update(db).await?;
        logging::database("update", "users", id);
        updated
    } else {
        let inserted = user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(username.to_string()),
            discriminator: Set(discriminator.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        logging::database("insert", "users", id);
        inserted
    };

    Ok(saved)
}

/// Removes a user. Memberships cascade.
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool> {
    let result = User::delete_by_id(id).exec(db).await?;
    logging::database("delete", "users", id);
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{SubsecRound, TimeDelta};

    #[tokio::test]
    async fn test_upsert_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let second_seen = Utc::now().trunc_subsecs(0);
        let first_seen = second_seen - TimeDelta::hours(1);

        let created = create_or_update_user_at(&db, TEST_USER_ID, "ferris", "0", first_seen).await?;
        let updated =
            create_or_update_user_at(&db, TEST_USER_ID, "ferris", "0", second_seen).await?;

        let rows = User::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.created_at, first_seen);
        assert_eq!(updated.updated_at, second_seen);
        assert_eq!(rows[0], updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_refreshes_mutable_fields() -> Result<()> {
        let db = setup_test_db().await?;

        create_or_update_user(&db, TEST_USER_ID, "ferris", "0").await?;
        create_or_update_user(&db, TEST_USER_ID, "crab", "1234").await?;

        let stored = find_by_id(&db, TEST_USER_ID).await?.unwrap();
        assert_eq!(stored.username, "crab");
        assert_eq!(stored.discriminator, "1234");
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_helpers() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "100000000000000001", "alice").await?;
        create_test_user(&db, "100000000000000002", "malice").await?;
        create_test_user(&db, "100000000000000003", "bob").await?;

        let found = find_by_username(&db, "lic").await?;
        let names: Vec<&str> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "malice"]);

        assert!(exists(&db, "100000000000000003").await?);
        assert!(!exists(&db, "100000000000000009").await?);

        assert!(delete(&db, "100000000000000003").await?);
        assert!(!exists(&db, "100000000000000003").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_id_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_or_update_user(&db, "  ", "ghost", "0").await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }
}
