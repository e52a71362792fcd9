//! Workflow parser — extracts structured scheduling intent from free text.
//!
//! The parser is a set of lightweight keyword heuristics, not NLP: cue-word
//! scanning for subjects, marker phrases for priority, keyword matching for
//! time-of-day, and a numeric-plus-unit pattern for duration.
//!
//! Parsing never fails. Every signal that cannot be extracted falls back to
//! a named default: no subjects → a single "General Study" subject, no
//! time keyword → no preference, no duration → 7 days.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Priority, Subject, TimeOfDay, WorkflowRequest};

/// Subject label used when nothing recognizable was found in the text.
pub const GENERAL_SUBJECT: &str = "General Study";

/// Planning duration assumed when the text names none.
pub const DEFAULT_DURATION_DAYS: u32 = 7;

/// Words that introduce a subject list ("study Math and Physics").
const CUE_WORDS: &[&str] = &[
    "study", "studying", "learn", "learning", "finals", "exam", "exams", "revise", "revising",
];

/// Phrases that promote a subject to high priority.
const HIGH_MARKERS: &[&str] = &["priority", "focus", "most important"];

/// Phrases that demote a subject to low priority.
const LOW_MARKERS: &[&str] = &["less important", "review only"];

/// Connectives allowed (and skipped) between a cue word and the subject.
const LEAD_WORDS: &[&str] = &["for", "in", "on", "my", "the", "a", "an", "some", "about"];

/// Words that terminate a subject phrase.
const STOP_WORDS: &[&str] = &[
    "for", "in", "on", "i", "to", "during", "over", "with", "because", "so", "this", "next",
    "is", "are", "and", "prefer", "before", "until", "my", "have", "since", "at", "by", "while",
    "but", "exam", "exams", "finals", "test", "tests", "class", "classes", "session", "sessions",
    "morning", "mornings", "afternoon", "afternoons", "evening", "evenings", "night", "nights",
    "day", "days", "week", "weeks", "daily", "today", "tomorrow",
];

/// Common capitalized words that are never subjects.
const NOT_SUBJECTS: &[&str] = &[
    "i", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

const MAX_SUBJECTS: usize = 6;
const MAX_SUBJECT_LEN: usize = 50;
const MAX_SUBJECT_WORDS: usize = 4;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse a free-text workflow description into a [`WorkflowRequest`].
pub fn parse_workflow(text: &str) -> WorkflowRequest {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut names = extract_subjects(&sentences);
    if names.is_empty() {
        names = capitalized_fallback(&sentences);
    }

    let subjects = if names.is_empty() {
        vec![Subject::new(GENERAL_SUBJECT, Priority::Medium)]
    } else {
        names
            .into_iter()
            .map(|name| {
                let priority = detect_priority(&sentences, &name);
                Subject { name, priority }
            })
            .collect()
    };

    WorkflowRequest {
        raw: text.to_owned(),
        subjects,
        time_of_day: detect_time_of_day(text),
        duration_days: detect_duration(text),
    }
}

// ---------------------------------------------------------------------------
// Subject extraction
// ---------------------------------------------------------------------------

/// Collect subject phrases following cue words, in order of appearance.
fn extract_subjects(sentences: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for sentence in sentences {
        // Earliest cue word wins; the rest of the sentence is the list.
        let Some((cue_pos, cue)) = CUE_WORDS
            .iter()
            .filter_map(|cue| find_word(sentence, cue).map(|pos| (pos, *cue)))
            .min_by_key(|(pos, _)| *pos)
        else {
            continue;
        };

        let tail = &sentence[cue_pos + cue.len()..];
        for piece in tail.split(',').flat_map(|p| p.split(" and ")) {
            if names.len() >= MAX_SUBJECTS {
                break;
            }
            if let Some(name) = clean_phrase(piece) {
                if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                    names.push(name);
                }
            }
        }
    }

    names
}

/// Find ASCII `word` in `haystack` at a word boundary, ignoring case.
///
/// Matches against the original string so the returned byte offset is
/// valid for slicing it, even when the surrounding text is non-ASCII.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    debug_assert!(word.is_ascii());
    for (pos, _) in haystack.char_indices() {
        let Some(candidate) = haystack.get(pos..pos + word.len()) else {
            continue;
        };
        if !candidate.eq_ignore_ascii_case(word) {
            continue;
        }
        let before_ok = !haystack[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());
        let after_ok = !haystack[pos + word.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(pos);
        }
    }
    None
}

/// Reduce one comma/"and"-separated piece to a subject name, or reject it.
fn clean_phrase(piece: &str) -> Option<String> {
    let mut words: Vec<&str> = Vec::new();

    for word in piece.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            continue;
        }
        let lower = word.to_lowercase();

        // Skip leading connectives ("for my Math exam" → "Math exam").
        if words.is_empty() && LEAD_WORDS.contains(&lower.as_str()) {
            continue;
        }
        if STOP_WORDS.contains(&lower.as_str()) || word.chars().any(|c| c.is_ascii_digit()) {
            break;
        }

        words.push(word);
        if words.len() >= MAX_SUBJECT_WORDS {
            break;
        }
    }

    if words.is_empty() {
        return None;
    }

    let name = words
        .iter()
        .map(|w| title_case(w))
        .collect::<Vec<_>>()
        .join(" ");

    if name.len() > MAX_SUBJECT_LEN {
        return None;
    }
    Some(name)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().chars()).collect(),
        None => String::new(),
    }
}

/// Last-resort subject scan: mid-sentence capitalized words.
fn capitalized_fallback(sentences: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for sentence in sentences {
        for (i, word) in sentence.split_whitespace().enumerate() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if i == 0 || word.len() < 3 {
                continue;
            }
            let mut chars = word.chars();
            let capitalized = chars.next().is_some_and(char::is_uppercase)
                && word.chars().all(char::is_alphabetic);
            let lower = word.to_lowercase();
            if !capitalized
                || NOT_SUBJECTS.contains(&lower.as_str())
                || STOP_WORDS.contains(&lower.as_str())
            {
                continue;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(word)) {
                names.push(word.to_owned());
            }
            if names.len() >= MAX_SUBJECTS {
                return names;
            }
        }
    }

    names
}

// ---------------------------------------------------------------------------
// Signal detection
// ---------------------------------------------------------------------------

/// Priority for a subject: the sentence that mentions it decides.
fn detect_priority(sentences: &[&str], subject: &str) -> Priority {
    let subject = subject.to_lowercase();

    for sentence in sentences {
        let lower = sentence.to_lowercase();
        if !lower.contains(&subject) {
            continue;
        }
        if LOW_MARKERS.iter().any(|m| lower.contains(m)) {
            return Priority::Low;
        }
        if HIGH_MARKERS.iter().any(|m| lower.contains(m)) {
            return Priority::High;
        }
    }

    Priority::Medium
}

/// Earliest time-of-day keyword in the text wins; "night" maps to evening.
fn detect_time_of_day(text: &str) -> TimeOfDay {
    let lower = text.to_lowercase();
    let candidates = [
        ("morning", TimeOfDay::Morning),
        ("afternoon", TimeOfDay::Afternoon),
        ("evening", TimeOfDay::Evening),
        ("night", TimeOfDay::Evening),
    ];

    candidates
        .iter()
        .filter_map(|(kw, tod)| lower.find(kw).map(|pos| (pos, *tod)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, tod)| tod)
        .unwrap_or(TimeOfDay::Any)
}

/// Numeric-plus-unit duration ("2 weeks", "10 days"); default 7 days.
fn detect_duration(text: &str) -> u32 {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = DURATION_RE
        .get_or_init(|| Regex::new(r"(?i)\b(\d{1,3})\s*(week|day)s?\b").expect("valid regex"));

    let Some(caps) = re.captures(text) else {
        return DEFAULT_DURATION_DAYS;
    };
    let n: u32 = caps[1].parse().unwrap_or(DEFAULT_DURATION_DAYS);
    let days = match caps[2].to_lowercase().as_str() {
        "week" => n.saturating_mul(7),
        _ => n,
    };
    days.max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
