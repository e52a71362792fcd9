//! Prompt construction for chat and schedule generation.
//!
//! Prompts are plain strings: both providers accept the whole conversation
//! as a single completion request, so history is inlined as labeled turns
//! rather than provider-specific message arrays.

use focusflow_core::{format_time, WorkflowRequest};

use crate::assistant::ChatTurn;

/// Most recent turns included in a chat prompt.
pub const HISTORY_WINDOW: usize = 10;

/// Assistant persona, shared by every chat prompt.
const PERSONA: &str = "You are FocusFlow, a study scheduling assistant for students. \
Help students optimize study schedules, give actionable time management advice, and \
suggest effective study techniques. Be encouraging and keep responses brief \
(2-3 sentences) unless detail is requested.";

/// Build the chat prompt: persona, a bounded window of recent history,
/// then the new message.
pub fn chat_prompt(message: &str, history: &[ChatTurn]) -> String {
    let mut prompt = String::from(PERSONA);
    prompt.push_str("\n\n");

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for turn in &history[start..] {
        let label = if turn.role == "assistant" {
            "Assistant"
        } else {
            "Student"
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }

    prompt.push_str("Student: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");
    prompt
}

/// Build the schedule-generation prompt from parsed workflow intent.
///
/// Asks for the exact block shape the validator in [`crate::schedule`]
/// expects: JSON only, weekdays 0-4, `HH:MM` times.
pub fn schedule_prompt(request: &WorkflowRequest) -> String {
    let mut subjects = String::new();
    for s in &request.subjects {
        subjects.push_str(&format!("- {} (priority: {})\n", s.name, s.priority.as_str()));
    }

    let tod = match serde_json::to_value(request.time_of_day) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "any".to_owned(),
    };

    format!(
        "Generate a weekly study schedule. Return ONLY valid JSON, no prose, in this shape:\n\
         {{\"study_blocks\": [{{\"day\": 0, \"start_time\": \"{example_start}\", \
         \"end_time\": \"{example_end}\", \"subject\": \"Subject\", \"topic\": \"Topic\", \
         \"priority\": \"high\"}}]}}\n\n\
         Rules:\n\
         - day is a weekday index 0-4 (Monday-Friday)\n\
         - times are 24-hour HH:MM\n\
         - blocks on the same day must not overlap\n\
         - priority is one of high, medium, low, copied from the subject\n\n\
         Subjects:\n{subjects}\n\
         Preferred time of day: {tod}\n\
         Planning duration: {days} days\n\n\
         Original request:\n{raw}",
        example_start = format_time(9 * 60),
        example_end = format_time(10 * 60),
        subjects = subjects,
        tod = tod,
        days = request.duration_days,
        raw = request.raw,
    )
}

/// Strip a markdown code fence from provider output, if present, and
/// return the JSON payload.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            let inner = rest.trim_start();
            if let Some(end) = inner.find("```") {
                return inner[..end].trim();
            }
            return inner.trim();
        }
    }

    // Unfenced: take from the first brace, models sometimes add a preamble.
    match trimmed.find('{') {
        Some(pos) => trimmed[pos..].trim(),
        None => trimmed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use focusflow_core::{parse_workflow, Priority, Subject, TimeOfDay};

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_owned(),
            content: content.to_owned(),
        }
    }

    #[test]
    fn chat_prompt_includes_persona_history_and_message() {
        let history = vec![turn("user", "hi"), turn("assistant", "hello!")];
        let prompt = chat_prompt("how do I focus?", &history);

        assert!(prompt.starts_with("You are FocusFlow"));
        assert!(prompt.contains("Student: hi\n"));
        assert!(prompt.contains("Assistant: hello!\n"));
        assert!(prompt.ends_with("Student: how do I focus?\nAssistant:"));
    }

    #[test]
    fn chat_prompt_bounds_history_window() {
        let history: Vec<ChatTurn> = (0..30).map(|i| turn("user", &format!("msg{i}"))).collect();
        let prompt = chat_prompt("latest", &history);

        assert!(!prompt.contains("msg19"));
        assert!(prompt.contains("msg20"));
        assert!(prompt.contains("msg29"));
    }

    #[test]
    fn schedule_prompt_names_subjects_and_constraints() {
        let req = WorkflowRequest {
            raw: "study Math in the morning".into(),
            subjects: vec![Subject::new("Math", Priority::High)],
            time_of_day: TimeOfDay::Morning,
            duration_days: 7,
        };
        let prompt = schedule_prompt(&req);

        assert!(prompt.contains("- Math (priority: high)"));
        assert!(prompt.contains("Preferred time of day: morning"));
        assert!(prompt.contains("Planning duration: 7 days"));
        assert!(prompt.contains("must not overlap"));
    }

    #[test]
    fn schedule_prompt_round_trips_parsed_request() {
        let req = parse_workflow("learn Rust and Go, 2 weeks, evenings");
        let prompt = schedule_prompt(&req);
        assert!(prompt.contains("- Rust (priority: medium)"));
        assert!(prompt.contains("Planning duration: 14 days"));
    }

    #[test]
    fn extract_json_handles_fences_and_preambles() {
        assert_eq!(extract_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(extract_json("Here you go:\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(extract_json("no json here"), "no json here");
    }
}
