//! # focusflow-llm
//!
//! AI provider integration for FocusFlow.
//!
//! - [`provider`] — startup credential inspection and provider selection
//!   (Gemini preferred, then Groq, else fallback mode).
//! - [`client`] — single-shot text generation against the selected
//!   provider with a bounded timeout and no retries.
//! - [`prompt`] — prompt construction for chat and schedule generation.
//! - [`schedule`] — parsing and validation of AI-produced schedule JSON.
//! - [`assistant`] — the fallback-aware pipeline that ties the above to
//!   the deterministic generators in `focusflow-core`.
//!
//! Provider failures are never fatal: every public entry point in
//! [`assistant`] degrades to a deterministic local answer.

pub mod assistant;
pub mod client;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod schedule;

// ── re-exports ───────────────────────────────────────────────────────

pub use assistant::{Assistant, ChatTurn, ScheduleSource};
pub use client::AiClient;
pub use error::{LlmError, Result};
pub use provider::{Provider, ProviderConfig};
