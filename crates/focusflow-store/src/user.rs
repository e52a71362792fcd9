//! User records.
//!
//! Identity is implicit: the web layer passes a sanitized username taken
//! from a request header, and a row is created on first use.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::db::Database;
use crate::error::StoreResult;

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier (UUID v7).
    pub id: String,
    pub username: String,
    /// Unix timestamp when the user was first seen.
    pub created_at: i64,
}

/// Lookup and creation of user rows.
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fetch the user with `username`, creating it on first use.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, username: &str) -> StoreResult<User> {
        let username = username.to_string();
        let id = Uuid::now_v7().to_string();
        let now = Utc::now().timestamp();

        let (user, created) = self
            .db
            .execute(move |conn| {
                let existing = conn
                    .query_row(
                        "SELECT id, username, created_at FROM users WHERE username = ?1",
                        rusqlite::params![username],
                        |row| {
                            Ok(User {
                                id: row.get(0)?,
                                username: row.get(1)?,
                                created_at: row.get(2)?,
                            })
                        },
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;

                if let Some(user) = existing {
                    return Ok((user, false));
                }

                conn.execute(
                    "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, username, now],
                )?;
                Ok((
                    User {
                        id,
                        username,
                        created_at: now,
                    },
                    true,
                ))
            })
            .await?;

        if created {
            debug!(user_id = %user.id, username = %user.username, "user created");
        }
        Ok(user)
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> UserStore {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        UserStore::new(db)
    }

    #[tokio::test]
    async fn creates_user_on_first_use() {
        let store = store().await;
        let user = store.get_or_create("demo_user").await.unwrap();
        assert_eq!(user.username, "demo_user");
        assert!(!user.id.is_empty());
    }

    #[tokio::test]
    async fn second_lookup_returns_same_user() {
        let store = store().await;
        let first = store.get_or_create("alex").await.unwrap();
        let second = store.get_or_create("alex").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn distinct_usernames_get_distinct_ids() {
        let store = store().await;
        let a = store.get_or_create("alex").await.unwrap();
        let b = store.get_or_create("sam").await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
