//! Schedule persistence.
//!
//! Each user has at most one active schedule. Regeneration replaces it
//! wholesale: the old schedule row and its blocks are deleted and the new
//! set inserted in a single transaction, so readers never observe a mix of
//! old and new blocks. Concurrent regenerations are last-write-wins.

use chrono::{Datelike, Duration, Utc};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use focusflow_core::{format_time, parse_time, Priority, StudyBlock};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};

/// A persisted schedule header. Blocks are stored separately.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSchedule {
    /// Unique identifier (UUID v7).
    pub id: String,
    pub user_id: String,
    /// ISO date of the Monday this schedule was planned from.
    pub week_start: String,
    /// "ai" or "fallback".
    pub source: String,
    pub created_at: i64,
}

/// Wholesale replacement and retrieval of per-user schedules.
#[derive(Clone)]
pub struct ScheduleStore {
    db: Database,
}

impl ScheduleStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Replace the user's active schedule with `blocks`.
    ///
    /// The originating workflow text is recorded alongside. Returns the new
    /// schedule id.
    #[instrument(skip(self, workflow_text, blocks), fields(blocks = blocks.len()))]
    pub async fn replace_for_user(
        &self,
        user_id: &str,
        workflow_text: &str,
        source: &str,
        blocks: &[StudyBlock],
    ) -> StoreResult<String> {
        let user_id = user_id.to_string();
        let workflow_text = workflow_text.to_string();
        let source = source.to_string();
        let blocks = blocks.to_vec();
        let schedule_id = Uuid::now_v7().to_string();
        let week_start = current_week_start();
        let now = Utc::now().timestamp();

        let id = schedule_id.clone();
        self.db
            .execute_mut(move |conn| {
                let tx = conn.transaction()?;

                // ON DELETE CASCADE removes the old blocks; old workflow
                // rows keep their text with the schedule link nulled.
                tx.execute(
                    "DELETE FROM schedules WHERE user_id = ?1",
                    rusqlite::params![user_id],
                )?;

                tx.execute(
                    "INSERT INTO schedules (id, user_id, week_start, source, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![schedule_id, user_id, week_start, source, now],
                )?;

                for b in &blocks {
                    tx.execute(
                        "INSERT INTO study_blocks \
                         (schedule_id, day, start_time, end_time, subject, topic, priority) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        rusqlite::params![
                            schedule_id,
                            b.day,
                            format_time(b.start),
                            format_time(b.end),
                            b.subject,
                            b.topic,
                            b.priority.as_str(),
                        ],
                    )?;
                }

                tx.execute(
                    "INSERT INTO workflows (user_id, workflow_text, schedule_id, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![user_id, workflow_text, schedule_id, now],
                )?;

                tx.commit()?;
                Ok(())
            })
            .await?;

        debug!(schedule_id = %id, "schedule replaced");
        Ok(id)
    }

    /// Fetch the user's active schedule and its blocks, ordered by day then
    /// start time. `None` if the user has never generated one.
    #[instrument(skip(self))]
    pub async fn active_for_user(
        &self,
        user_id: &str,
    ) -> StoreResult<Option<(StoredSchedule, Vec<StudyBlock>)>> {
        let user_id = user_id.to_string();

        self.db
            .execute(move |conn| {
                let schedule = conn
                    .query_row(
                        "SELECT id, user_id, week_start, source, created_at FROM schedules \
                         WHERE user_id = ?1 ORDER BY created_at DESC LIMIT 1",
                        rusqlite::params![user_id],
                        |row| {
                            Ok(StoredSchedule {
                                id: row.get(0)?,
                                user_id: row.get(1)?,
                                week_start: row.get(2)?,
                                source: row.get(3)?,
                                created_at: row.get(4)?,
                            })
                        },
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;

                let Some(schedule) = schedule else {
                    return Ok(None);
                };

                let mut stmt = conn.prepare(
                    "SELECT day, start_time, end_time, subject, topic, priority \
                     FROM study_blocks WHERE schedule_id = ?1 \
                     ORDER BY day, start_time",
                )?;
                let raw = stmt
                    .query_map(rusqlite::params![schedule.id], |row| {
                        Ok((
                            row.get::<_, u8>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Option<String>>(4)?,
                            row.get::<_, String>(5)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                let mut blocks = Vec::with_capacity(raw.len());
                for (day, start, end, subject, topic, priority) in raw {
                    let start = parse_time(&start).ok_or_else(|| {
                        StoreError::Corrupt(format!("bad start_time {start:?}"))
                    })?;
                    let end = parse_time(&end)
                        .ok_or_else(|| StoreError::Corrupt(format!("bad end_time {end:?}")))?;
                    blocks.push(StudyBlock {
                        day,
                        start,
                        end,
                        subject,
                        topic,
                        priority: Priority::parse_lenient(&priority),
                    });
                }

                Ok(Some((schedule, blocks)))
            })
            .await
    }
}

/// ISO date of the Monday of the current week.
fn current_week_start() -> String {
    let today = Utc::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    monday.to_string()
}

// ── tests ────────────────────────────────────────────────────────────
