//! Core domain types.
//!
//! These types model the data flowing through the scheduling pipeline.
//! [`WorkflowRequest`] is ephemeral (produced by the parser, consumed by the
//! synthesizer, never persisted); [`StudyBlock`] is the persisted unit of a
//! weekly schedule.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Importance of a subject, copied onto every block scheduled for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Stable sort key: high sorts before medium before low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a priority label, defaulting to medium for anything unknown.
    ///
    /// Used when reading rows back from the store and when accepting
    /// AI-produced output — an unexpected label is not worth failing over.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// Preferred part of the day for study sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    /// No preference — sessions rotate across all three windows.
    Any,
}

// ---------------------------------------------------------------------------
// Workflow request
// ---------------------------------------------------------------------------

/// One subject extracted from a workflow description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub priority: Priority,
}

impl Subject {
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Parsed intent of a free-text workflow description.
///
/// Exists only for the duration of one generate-schedule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    /// The original text, untouched.
    pub raw: String,
    /// Subjects in the order they appeared in the text.
    pub subjects: Vec<Subject>,
    /// Time-of-day preference.
    pub time_of_day: TimeOfDay,
    /// Requested planning duration in calendar days.
    pub duration_days: u32,
}

// ---------------------------------------------------------------------------
// Study block
// ---------------------------------------------------------------------------

/// A single scheduled time interval for one subject on one weekday.
///
/// `day` is 0–4 (Monday–Friday). Times are minutes from midnight; use
/// [`format_time`] for the `HH:MM` wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyBlock {
    /// Weekday index, 0 = Monday through 4 = Friday.
    pub day: u8,
    /// Start, minutes from midnight.
    pub start: u16,
    /// End, minutes from midnight. Always greater than `start`.
    pub end: u16,
    pub subject: String,
    pub topic: Option<String>,
    pub priority: Priority,
}

impl StudyBlock {
    /// Whether two blocks occupy intersecting time ranges on the same day.
    pub fn overlaps(&self, other: &StudyBlock) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// Check the schedule invariant: no two blocks on the same day overlap.
pub fn overlap_free(blocks: &[StudyBlock]) -> bool {
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.overlaps(b) {
                return false;
            }
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Time helpers
// ---------------------------------------------------------------------------

/// Render minutes-from-midnight as `HH:MM`.
pub fn format_time(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse `HH:MM` (or `H:MM`) into minutes from midnight.
pub fn parse_time(s: &str) -> Option<u16> {
    let (h, m) = s.trim().split_once(':')?;
    let h: u16 = h.trim().parse().ok()?;
    let m: u16 = m.trim().parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn priority_parse_lenient_defaults_to_medium() {
        assert_eq!(Priority::parse_lenient("HIGH"), Priority::High);
        assert_eq!(Priority::parse_lenient("low"), Priority::Low);
        assert_eq!(Priority::parse_lenient("urgent"), Priority::Medium);
        assert_eq!(Priority::parse_lenient(""), Priority::Medium);
    }

    #[test]
    fn time_round_trip() {
        assert_eq!(format_time(8 * 60), "08:00");
        assert_eq!(format_time(13 * 60 + 45), "13:45");
        assert_eq!(parse_time("08:00"), Some(480));
        assert_eq!(parse_time("9:15"), Some(555));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("nope"), None);
    }

    #[test]
    fn overlap_detection() {
        let a = StudyBlock {
            day: 0,
            start: 480,
            end: 540,
            subject: "Math".into(),
            topic: None,
            priority: Priority::High,
        };
        let mut b = a.clone();
        b.start = 530;
        b.end = 590;
        assert!(a.overlaps(&b));

        // Touching intervals do not overlap.
        b.start = 540;
        b.end = 600;
        assert!(!a.overlaps(&b));

        // Same times on a different day do not overlap.
        b.start = 480;
        b.end = 540;
        b.day = 1;
        assert!(!a.overlaps(&b));

        assert!(overlap_free(&[a, b]));
    }

    #[test]
    fn serde_wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&Priority::High).unwrap(),
            "\"high\""
        );
        assert_eq!(
            serde_json::to_string(&TimeOfDay::Morning).unwrap(),
            "\"morning\""
        );
    }
}
