//! Hierarchical study goals.
//!
//! Goals form a tree per user: a goal may reference a parent, and the
//! listing endpoint returns roots with children nested inside them.

use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

use crate::db::Database;
use crate::error::StoreResult;

/// A study goal, possibly with nested children.
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form kind tag ("goal", "milestone", ...).
    pub kind: String,
    pub parent_id: Option<i64>,
    /// "high", "medium", or "low".
    pub priority: String,
    pub completed: bool,
    pub created_at: i64,
    /// Child goals, populated by [`GoalStore::tree_for_user`].
    pub children: Vec<Goal>,
}

/// Fields for a new goal.
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub parent_id: Option<i64>,
    pub priority: Option<String>,
}

/// Creation and tree-shaped listing of goals.
#[derive(Clone)]
pub struct GoalStore {
    db: Database,
}

impl GoalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a goal and return its row id.
    #[instrument(skip(self, goal), fields(title = %goal.title))]
    pub async fn create(&self, user_id: &str, goal: NewGoal) -> StoreResult<i64> {
        let user_id = user_id.to_string();
        let now = Utc::now().timestamp();

        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO goals \
                     (user_id, title, description, kind, parent_id, priority, completed, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
                    rusqlite::params![
                        user_id,
                        goal.title,
                        goal.description,
                        goal.kind.unwrap_or_else(|| "goal".to_string()),
                        goal.parent_id,
                        goal.priority.unwrap_or_else(|| "medium".to_string()),
                        now,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// List a user's goals as a tree: roots in creation order, children
    /// nested under their parents.
    #[instrument(skip(self))]
    pub async fn tree_for_user(&self, user_id: &str) -> StoreResult<Vec<Goal>> {
        let user_id = user_id.to_string();

        let flat = self
            .db
            .execute(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, title, description, kind, parent_id, priority, \
                            completed, created_at \
                     FROM goals WHERE user_id = ?1 ORDER BY created_at, id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![user_id], |row| {
                        Ok(Goal {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            title: row.get(2)?,
                            description: row.get(3)?,
                            kind: row.get(4)?,
                            parent_id: row.get(5)?,
                            priority: row.get(6)?,
                            completed: row.get(7)?,
                            created_at: row.get(8)?,
                            children: Vec::new(),
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(build_tree(flat))
    }
}

/// Assemble a flat goal list into nested roots. A goal whose parent does
/// not exist is dropped rather than promoted.
fn build_tree(flat: Vec<Goal>) -> Vec<Goal> {
    let ids: HashSet<i64> = flat.iter().map(|g| g.id).collect();

    let mut roots = Vec::new();
    let mut children_of: HashMap<i64, Vec<Goal>> = HashMap::new();
    for goal in flat {
        match goal.parent_id {
            None => roots.push(goal),
            Some(p) if ids.contains(&p) => children_of.entry(p).or_default().push(goal),
            Some(_) => {}
        }
    }

    fn attach(node: &mut Goal, children_of: &mut HashMap<i64, Vec<Goal>>) {
        if let Some(mut kids) = children_of.remove(&node.id) {
            for kid in &mut kids {
                attach(kid, children_of);
            }
            node.children = kids;
        }
    }

    for root in &mut roots {
        attach(root, &mut children_of);
    }
    roots
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserStore;

    async fn setup() -> (GoalStore, String) {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        let user = UserStore::new(db.clone())
            .get_or_create("demo_user")
            .await
            .unwrap();
        (GoalStore::new(db), user.id)
    }

    fn titled(title: &str) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_user_has_no_goals() {
        let (store, user_id) = setup().await;
        assert!(store.tree_for_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn children_nest_under_their_parent() {
        let (store, user_id) = setup().await;

        let root = store.create(&user_id, titled("Pass finals")).await.unwrap();
        store
            .create(
                &user_id,
                NewGoal {
                    title: "Finish calculus revision".to_string(),
                    parent_id: Some(root),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store.create(&user_id, titled("Learn Rust")).await.unwrap();

        let tree = store.tree_for_user(&user_id).await.unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].title, "Pass finals");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].title, "Finish calculus revision");
        assert!(tree[1].children.is_empty());
    }

    #[tokio::test]
    async fn defaults_apply_to_kind_and_priority() {
        let (store, user_id) = setup().await;
        store.create(&user_id, titled("Read more")).await.unwrap();

        let tree = store.tree_for_user(&user_id).await.unwrap();
        assert_eq!(tree[0].kind, "goal");
        assert_eq!(tree[0].priority, "medium");
        assert!(!tree[0].completed);
    }

    #[test]
    fn orphaned_goal_is_dropped_from_the_tree() {
        let goal = |id: i64, parent: Option<i64>| Goal {
            id,
            user_id: "u".to_string(),
            title: format!("g{id}"),
            description: None,
            kind: "goal".to_string(),
            parent_id: parent,
            priority: "medium".to_string(),
            completed: false,
            created_at: 0,
            children: Vec::new(),
        };

        let tree = build_tree(vec![goal(1, None), goal(2, Some(99))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 1);
    }
}
