//! Chat history persistence.
//!
//! Messages are append-only and ordered by insertion. The history query
//! returns the most recent window in chronological order, which is also
//! the shape fed back into chat prompts.

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::db::Database;
use crate::error::StoreResult;

/// Default number of messages returned by [`ChatStore::recent`].
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Hard cap on the history window, regardless of what the caller asks for.
pub const MAX_HISTORY_LIMIT: u32 = 200;

/// One persisted chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    /// Unix timestamp when the message was stored.
    pub created_at: i64,
}

/// Append-only chat history per user.
#[derive(Clone)]
pub struct ChatStore {
    db: Database,
}

impl ChatStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append one message to a user's history.
    #[instrument(skip(self, content))]
    pub async fn append(&self, user_id: &str, role: &str, content: &str) -> StoreResult<ChatMessage> {
        let user_id = user_id.to_string();
        let role = role.to_string();
        let content = content.to_string();
        let now = Utc::now().timestamp();

        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO chat_history (user_id, role, content, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![user_id, role, content, now],
                )?;
                let id = conn.last_insert_rowid();
                Ok(ChatMessage {
                    id,
                    user_id,
                    role,
                    content,
                    created_at: now,
                })
            })
            .await
    }

    /// Return the most recent `limit` messages in chronological order.
    ///
    /// `None` means [`DEFAULT_HISTORY_LIMIT`]; anything above
    /// [`MAX_HISTORY_LIMIT`] is clamped.
    #[instrument(skip(self))]
    pub async fn recent(&self, user_id: &str, limit: Option<u32>) -> StoreResult<Vec<ChatMessage>> {
        let user_id = user_id.to_string();
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);

        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, role, content, created_at FROM chat_history \
                     WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2",
                )?;
                let mut rows = stmt
                    .query_map(rusqlite::params![user_id, limit], |row| {
                        Ok(ChatMessage {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            role: row.get(2)?,
                            content: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                // Fetched newest-first to apply the limit; flip back.
                rows.reverse();
                Ok(rows)
            })
            .await
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserStore;

    async fn setup() -> (ChatStore, String) {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        let user = UserStore::new(db.clone())
            .get_or_create("demo_user")
            .await
            .unwrap();
        (ChatStore::new(db), user.id)
    }

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let (store, user_id) = setup().await;

        store.append(&user_id, "user", "hello").await.unwrap();
        store.append(&user_id, "assistant", "hi!").await.unwrap();

        let history = store.recent(&user_id, None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].role, "assistant");
    }

    #[tokio::test]
    async fn recent_returns_newest_window_chronologically() {
        let (store, user_id) = setup().await;
        for i in 0..10 {
            store
                .append(&user_id, "user", &format!("msg{i}"))
                .await
                .unwrap();
        }

        let history = store.recent(&user_id, Some(3)).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "msg7");
        assert_eq!(history[2].content, "msg9");
    }

    #[tokio::test]
    async fn limit_is_clamped_to_the_cap() {
        let (store, user_id) = setup().await;
        for i in 0..(MAX_HISTORY_LIMIT + 10) {
            store
                .append(&user_id, "user", &format!("msg{i}"))
                .await
                .unwrap();
        }

        let history = store.recent(&user_id, Some(10_000)).await.unwrap();
        assert_eq!(history.len(), MAX_HISTORY_LIMIT as usize);
    }

    #[tokio::test]
    async fn histories_are_isolated_per_user() {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        let users = UserStore::new(db.clone());
        let a = users.get_or_create("alex").await.unwrap();
        let b = users.get_or_create("sam").await.unwrap();
        let store = ChatStore::new(db);

        store.append(&a.id, "user", "from alex").await.unwrap();

        assert_eq!(store.recent(&a.id, None).await.unwrap().len(), 1);
        assert!(store.recent(&b.id, None).await.unwrap().is_empty());
    }
}
