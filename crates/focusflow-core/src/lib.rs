//! # focusflow-core
//!
//! Deterministic core logic for FocusFlow.
//!
//! Everything in this crate is pure and synchronous: free-text workflow
//! parsing, weekly schedule synthesis, and the canned-advice rule table
//! used when no AI provider is reachable. The AI-assisted paths live in
//! `focusflow-llm`; they validate their output against the invariants
//! defined here and fall back to these generators on any failure.

pub mod parser;
pub mod responder;
pub mod synthesizer;
pub mod types;

// ── re-exports ───────────────────────────────────────────────────────

pub use parser::parse_workflow;
pub use responder::{all_advice_texts, fallback_advice, DEFAULT_ADVICE};
pub use synthesizer::synthesize;
pub use types::{
    format_time, overlap_free, parse_time, Priority, StudyBlock, Subject, TimeOfDay,
    WorkflowRequest,
};
