//! Shared application state for the web server.

use focusflow_llm::Assistant;
use focusflow_store::{ChatStore, Database, GoalStore, ScheduleStore, UserStore};

/// State shared by all request handlers.
///
/// Stores are cheap clones over the same [`Database`] handle; the
/// [`Assistant`] carries the provider selected at startup (or none, in
/// fallback mode).
pub struct AppState {
    pub assistant: Assistant,
    pub users: UserStore,
    pub chat: ChatStore,
    pub schedules: ScheduleStore,
    pub goals: GoalStore,
}

impl AppState {
    /// Assemble state from a migrated database and a configured assistant.
    pub fn new(db: Database, assistant: Assistant) -> Self {
        Self {
            assistant,
            users: UserStore::new(db.clone()),
            chat: ChatStore::new(db.clone()),
            schedules: ScheduleStore::new(db.clone()),
            goals: GoalStore::new(db),
        }
    }
}
