//! Storage layer for FocusFlow.
//!
//! SQLite-backed persistence behind a [`Database`] handle that dispatches
//! blocking work onto the tokio thread pool. Schema changes go through the
//! versioned migrations in [`migration`]; domain access goes through the
//! per-entity stores:
//!
//! - [`UserStore`] — implicit identity, created on first use
//! - [`ChatStore`] — append-only chat history with a bounded read window
//! - [`ScheduleStore`] — one active schedule per user, replaced wholesale
//! - [`GoalStore`] — hierarchical goals listed as a tree

pub mod chat;
pub mod db;
pub mod error;
pub mod goal;
pub mod migration;
pub mod schedule;
pub mod user;

pub use chat::{ChatMessage, ChatStore, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use goal::{Goal, GoalStore, NewGoal};
pub use schedule::{ScheduleStore, StoredSchedule};
pub use user::{User, UserStore};
