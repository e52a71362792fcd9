//! Parsing and validation of AI-produced schedule JSON.
//!
//! The provider is asked for the same block shape the deterministic
//! synthesizer produces. Its output is accepted only if every block passes
//! the schedule invariants — weekday in range, start before end, no per-day
//! overlap. Anything else rejects the whole output and the caller falls
//! back to the deterministic synthesizer; invalid blocks are never
//! persisted.

use serde::Deserialize;

use focusflow_core::{overlap_free, parse_time, Priority, StudyBlock};

use crate::error::{LlmError, Result};
use crate::prompt::extract_json;

/// Wire shape requested from the provider.
#[derive(Debug, Deserialize)]
struct AiSchedule {
    study_blocks: Vec<AiBlock>,
}

#[derive(Debug, Deserialize)]
struct AiBlock {
    day: i64,
    start_time: String,
    end_time: String,
    subject: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

/// Parse provider output into validated [`StudyBlock`]s.
pub fn parse_ai_schedule(text: &str) -> Result<Vec<StudyBlock>> {
    let payload = extract_json(text);
    let parsed: AiSchedule = serde_json::from_str(payload)?;

    if parsed.study_blocks.is_empty() {
        return Err(LlmError::InvalidSchedule {
            reason: "no study blocks in output".into(),
        });
    }

    let mut blocks = Vec::with_capacity(parsed.study_blocks.len());
    for b in parsed.study_blocks {
        blocks.push(validate_block(b)?);
    }

    if !overlap_free(&blocks) {
        return Err(LlmError::InvalidSchedule {
            reason: "blocks overlap within a day".into(),
        });
    }

    blocks.sort_by_key(|b| (b.day, b.start));
    Ok(blocks)
}

fn validate_block(b: AiBlock) -> Result<StudyBlock> {
    if !(0..=4).contains(&b.day) {
        return Err(LlmError::InvalidSchedule {
            reason: format!("day {} outside the Monday-Friday grid", b.day),
        });
    }

    let start = parse_time(&b.start_time).ok_or_else(|| LlmError::InvalidSchedule {
        reason: format!("unparseable start_time {:?}", b.start_time),
    })?;
    let end = parse_time(&b.end_time).ok_or_else(|| LlmError::InvalidSchedule {
        reason: format!("unparseable end_time {:?}", b.end_time),
    })?;
    if start >= end {
        return Err(LlmError::InvalidSchedule {
            reason: format!("start {} is not before end {}", b.start_time, b.end_time),
        });
    }

    let subject = b.subject.trim();
    if subject.is_empty() {
        return Err(LlmError::InvalidSchedule {
            reason: "block with empty subject".into(),
        });
    }

    Ok(StudyBlock {
        day: b.day as u8,
        start,
        end,
        subject: subject.to_owned(),
        topic: b.topic.filter(|t| !t.trim().is_empty()),
        priority: Priority::parse_lenient(b.priority.as_deref().unwrap_or("medium")),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_output_is_accepted_and_sorted() {
        let text = r#"```json
        {"study_blocks": [
            {"day": 1, "start_time": "09:00", "end_time": "10:00",
             "subject": "Physics", "topic": "Optics", "priority": "medium"},
            {"day": 0, "start_time": "08:00", "end_time": "09:00",
             "subject": "Math", "priority": "high"}
        ]}
        ```"#;

        let blocks = parse_ai_schedule(text).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].subject, "Math");
        assert_eq!(blocks[0].day, 0);
        assert_eq!(blocks[0].priority, Priority::High);
        assert_eq!(blocks[1].topic.as_deref(), Some("Optics"));
    }

    #[test]
    fn weekend_day_is_rejected() {
        let text = r#"{"study_blocks": [
            {"day": 5, "start_time": "09:00", "end_time": "10:00", "subject": "Math"}
        ]}"#;
        assert!(matches!(
            parse_ai_schedule(text),
            Err(LlmError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn overlapping_blocks_are_rejected() {
        let text = r#"{"study_blocks": [
            {"day": 0, "start_time": "09:00", "end_time": "10:30", "subject": "Math"},
            {"day": 0, "start_time": "10:00", "end_time": "11:00", "subject": "Physics"}
        ]}"#;
        assert!(matches!(
            parse_ai_schedule(text),
            Err(LlmError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn inverted_times_are_rejected() {
        let text = r#"{"study_blocks": [
            {"day": 0, "start_time": "11:00", "end_time": "09:00", "subject": "Math"}
        ]}"#;
        assert!(parse_ai_schedule(text).is_err());
    }

    #[test]
    fn prose_instead_of_json_is_a_parse_error() {
        assert!(matches!(
            parse_ai_schedule("Sure! Here is a schedule for you."),
            Err(LlmError::ParseFailed { .. })
        ));
    }

    #[test]
    fn empty_block_list_is_rejected() {
        assert!(matches!(
            parse_ai_schedule(r#"{"study_blocks": []}"#),
            Err(LlmError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn unknown_priority_defaults_to_medium() {
        let text = r#"{"study_blocks": [
            {"day": 2, "start_time": "18:00", "end_time": "19:00",
             "subject": "History", "priority": "critical"}
        ]}"#;
        let blocks = parse_ai_schedule(text).unwrap();
        assert_eq!(blocks[0].priority, Priority::Medium);
    }
}
