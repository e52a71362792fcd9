//! Deterministic weekly schedule synthesis.
//!
//! Converts a parsed [`WorkflowRequest`] into an ordered set of
//! non-overlapping [`StudyBlock`]s across a Monday–Friday grid. The
//! algorithm is a heuristic, not a solver: fixed time windows, fixed
//! session length, priority-ordered round-robin allocation. The same
//! request always produces the same blocks, which is what makes the
//! no-AI fallback path testable.

use crate::types::{Priority, StudyBlock, Subject, TimeOfDay, WorkflowRequest};

/// Minutes in one study session.
const SESSION_MINUTES: u16 = 60;

/// Break between consecutive sessions in the same window.
const BREAK_MINUTES: u16 = 15;

/// Weekdays on the grid (Monday–Friday).
const WEEKDAYS: u32 = 5;

/// Planning horizon cap, in weekdays (two working weeks).
const MAX_PLANNING_WEEKDAYS: u32 = 10;

/// Hard ceiling on blocks per schedule, guarding pathological input.
const MAX_BLOCKS: u32 = 20;

/// A fixed daily time window, minutes from midnight.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: u16,
    end: u16,
}

/// The three candidate windows, in rotation order.
const WINDOWS: [Window; 3] = [
    // Morning 08:00–11:00
    Window {
        start: 8 * 60,
        end: 11 * 60,
    },
    // Afternoon 13:00–16:00
    Window {
        start: 13 * 60,
        end: 16 * 60,
    },
    // Evening 18:00–21:00
    Window {
        start: 18 * 60,
        end: 21 * 60,
    },
];

/// Sessions that fit in one window: starts every 75 minutes, must end
/// inside the window. 180-minute windows hold two.
const SLOTS_PER_WINDOW: u16 = {
    let span = WINDOWS[0].end - WINDOWS[0].start;
    let stride = SESSION_MINUTES + BREAK_MINUTES;
    (span - SESSION_MINUTES) / stride + 1
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Synthesize an ordered, non-overlapping block set for `request`.
///
/// Subjects are served in priority order (stable within equal priority),
/// sessions are spread round-robin across the weekdays, and allocation
/// stops once the requested duration (capped to a 10-weekday horizon) or
/// the block ceiling is exhausted.
pub fn synthesize(request: &WorkflowRequest) -> Vec<StudyBlock> {
    let mut subjects: Vec<&Subject> = request.subjects.iter().collect();
    if subjects.is_empty() {
        return Vec::new();
    }
    // Stable: equal priorities keep their parse order.
    subjects.sort_by_key(|s| s.priority.rank());

    let total = session_budget(request.duration_days);

    let mut blocks: Vec<StudyBlock> = Vec::with_capacity(total as usize);
    let mut used = [[0u16; WINDOWS.len()]; WEEKDAYS as usize];

    for i in 0..total {
        let day = (i % WEEKDAYS) as u8;
        let pass = i / WEEKDAYS;

        let window_idx = match request.time_of_day {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
            // No preference: rotate windows across the week and across passes.
            TimeOfDay::Any => ((day as u32 + pass) % WINDOWS.len() as u32) as usize,
        };

        let slot = used[day as usize][window_idx];
        if slot >= SLOTS_PER_WINDOW {
            // The fill pattern is uniform, so the first full window means
            // every remaining slot in this pattern is full too.
            break;
        }
        used[day as usize][window_idx] = slot + 1;

        let window = WINDOWS[window_idx];
        let start = window.start + slot * (SESSION_MINUTES + BREAK_MINUTES);

        // Round-robin, but never the same subject back to back: if the
        // block immediately before this one on the same day has the same
        // subject, rotate one step further. With one subject left the
        // repeat is unavoidable and allowed.
        let mut idx = (i as usize) % subjects.len();
        if subjects.len() > 1 {
            let prev = blocks
                .iter()
                .filter(|b| b.day == day && b.start < start)
                .max_by_key(|b| b.start);
            if prev.is_some_and(|b| b.subject == subjects[idx].name) {
                idx = (idx + 1) % subjects.len();
            }
        }
        let subject = subjects[idx];

        blocks.push(StudyBlock {
            day,
            start,
            end: start + SESSION_MINUTES,
            subject: subject.name.clone(),
            topic: Some("Study session".to_owned()),
            priority: subject.priority,
        });
    }

    blocks.sort_by_key(|b| (b.day, b.start));
    blocks
}

/// Number of sessions to allocate for a duration in calendar days.
///
/// Calendar days map onto weekdays at 5/7, clamped to 1..=10 weekdays,
/// then bounded by the block ceiling.
fn session_budget(duration_days: u32) -> u32 {
    let weekdays = (duration_days * WEEKDAYS / 7).clamp(1, MAX_PLANNING_WEEKDAYS);
    (weekdays * SLOTS_PER_WINDOW as u32).min(MAX_BLOCKS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_workflow;
    use crate::types::overlap_free;

    fn request(subjects: Vec<Subject>, tod: TimeOfDay, days: u32) -> WorkflowRequest {
        WorkflowRequest {
            raw: String::new(),
            subjects,
            time_of_day: tod,
            duration_days: days,
        }
    }

    #[test]
    fn slots_per_window_is_two() {
        assert_eq!(SLOTS_PER_WINDOW, 2);
    }

    #[test]
    fn blocks_never_overlap() {
        let cases = [
            request(vec![Subject::new("Math", Priority::High)], TimeOfDay::Any, 14),
            request(
                vec![
                    Subject::new("Math", Priority::High),
                    Subject::new("Physics", Priority::Medium),
                    Subject::new("History", Priority::Low),
                ],
                TimeOfDay::Morning,
                7,
            ),
            request(
                (0..10)
                    .map(|i| Subject::new(format!("Subject {i}"), Priority::Medium))
                    .collect(),
                TimeOfDay::Evening,
                365,
            ),
        ];
        for req in &cases {
            let blocks = synthesize(req);
            assert!(!blocks.is_empty());
            assert!(overlap_free(&blocks), "overlap for {req:?}");
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        let req = request(
            vec![
                Subject::new("Math", Priority::High),
                Subject::new("Physics", Priority::Medium),
            ],
            TimeOfDay::Any,
            10,
        );
        assert_eq!(synthesize(&req), synthesize(&req));
    }

    #[test]
    fn full_scenario_blocks() {
        let req = parse_workflow(
            "I need to study Math, Physics, and Chemistry for finals. \
             I have 2 weeks and prefer morning sessions. Math is my priority.",
        );
        let blocks = synthesize(&req);

        // 14 days cap to 10 weekdays; morning capacity is 2 slots × 5 days.
        assert_eq!(blocks.len(), 10);
        assert!(overlap_free(&blocks));

        let morning = &WINDOWS[0];
        for b in &blocks {
            assert!(b.day <= 4);
            assert!(b.start >= morning.start && b.end <= morning.end);
        }

        // Math is high priority, so it takes the first Monday slot.
        let first = blocks.iter().min_by_key(|b| (b.day, b.start)).unwrap();
        assert_eq!(first.subject, "Math");
        assert_eq!(first.priority, Priority::High);
    }

    #[test]
    fn priority_order_is_served_first() {
        let req = request(
            vec![
                Subject::new("History", Priority::Low),
                Subject::new("Math", Priority::High),
                Subject::new("Physics", Priority::Medium),
            ],
            TimeOfDay::Afternoon,
            7,
        );
        let blocks = synthesize(&req);

        // Allocation order is day 0, 1, 2, ... so Monday's first block
        // belongs to the highest-priority subject.
        assert_eq!(blocks[0].day, 0);
        assert_eq!(blocks[0].subject, "Math");
        // Priority on each block is copied from its subject.
        for b in &blocks {
            match b.subject.as_str() {
                "Math" => assert_eq!(b.priority, Priority::High),
                "Physics" => assert_eq!(b.priority, Priority::Medium),
                "History" => assert_eq!(b.priority, Priority::Low),
                other => panic!("unexpected subject {other}"),
            }
        }
    }

    #[test]
    fn no_subject_twice_in_succession_with_multiple_subjects() {
        // 5 subjects is the case where plain round-robin lines up with
        // the 5-day week and repeats within a day.
        for count in [2, 3, 5] {
            let req = request(
                (0..count)
                    .map(|i| Subject::new(format!("Subject {i}"), Priority::Medium))
                    .collect(),
                TimeOfDay::Morning,
                14,
            );
            let blocks = synthesize(&req);
            assert!(!blocks.is_empty());
            for pair in blocks.windows(2) {
                if pair[0].day == pair[1].day {
                    assert_ne!(
                        pair[0].subject, pair[1].subject,
                        "repeat on day {} at {} with {count} subjects",
                        pair[0].day, pair[1].start,
                    );
                }
            }
        }
    }

    #[test]
    fn block_count_is_capped() {
        let req = request(
            vec![Subject::new("Math", Priority::High)],
            TimeOfDay::Any,
            10_000,
        );
        assert!(synthesize(&req).len() as u32 <= MAX_BLOCKS);
    }

    #[test]
    fn short_duration_allocates_fewer_sessions() {
        let req = request(
            vec![Subject::new("Math", Priority::High)],
            TimeOfDay::Morning,
            2,
        );
        // 2 days → 1 weekday → 2 sessions.
        assert_eq!(synthesize(&req).len(), 2);
    }

    #[test]
    fn empty_subject_list_yields_no_blocks() {
        let req = request(vec![], TimeOfDay::Any, 7);
        assert!(synthesize(&req).is_empty());
    }
}
