//! The fallback-aware request pipeline.
//!
//! [`Assistant`] holds the provider configuration resolved once at startup
//! and decides, per request, whether to call the provider or answer from
//! the deterministic generators in `focusflow-core`. Provider failures are
//! logged and recovered locally; nothing in this module returns an error
//! to its caller.

use std::sync::Arc;

use serde::Serialize;

use focusflow_core::{fallback_advice, synthesize, StudyBlock, WorkflowRequest};

use crate::client::AiClient;
use crate::prompt::{chat_prompt, schedule_prompt};
use crate::provider::ProviderConfig;
use crate::schedule::parse_ai_schedule;

/// Generation limits for chat completions.
const CHAT_MAX_TOKENS: u32 = 500;
const CHAT_TEMPERATURE: f32 = 0.7;

/// Generation limits for schedule JSON. Lower temperature: we want a
/// parseable structure, not creativity.
const SCHEDULE_MAX_TOKENS: u32 = 2000;
const SCHEDULE_TEMPERATURE: f32 = 0.5;

/// One prior conversation turn, as fed into the chat prompt.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

/// Which generator produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleSource {
    /// Validated provider output.
    Ai,
    /// The deterministic synthesizer (fallback mode or recovered failure).
    Fallback,
}

/// Fallback-aware entry point for chat and schedule generation.
#[derive(Clone)]
pub struct Assistant {
    client: Option<Arc<AiClient>>,
}

impl Assistant {
    /// Build from the provider selected at startup.
    ///
    /// A configuration that fails to produce a client (which only happens
    /// for a blank credential) degrades to fallback mode rather than
    /// aborting startup.
    pub fn new(config: Option<ProviderConfig>) -> Self {
        let client = config.and_then(|c| match AiClient::new(c) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "ai client unavailable, using fallback mode");
                None
            }
        });
        Self { client }
    }

    /// Whether a provider is active.
    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Name of the active provider, if any.
    pub fn provider_name(&self) -> Option<&'static str> {
        self.client.as_ref().map(|c| c.provider().name())
    }

    /// Model id of the active provider, if any.
    pub fn model(&self) -> Option<String> {
        self.client.as_ref().map(|c| c.model().to_owned())
    }

    /// Answer a chat message. Never fails: provider errors degrade to the
    /// canned-advice table.
    pub async fn respond(&self, message: &str, history: &[ChatTurn]) -> String {
        if let Some(client) = &self.client {
            let prompt = chat_prompt(message, history);
            match client.generate(&prompt, CHAT_MAX_TOKENS, CHAT_TEMPERATURE).await {
                Ok(text) => return text.trim().to_owned(),
                Err(e) => {
                    tracing::warn!(error = %e, "chat generation failed, using canned advice");
                }
            }
        }
        fallback_advice(message).to_owned()
    }

    /// Produce a validated block set for `request`. Never fails: invalid or
    /// unavailable provider output falls back to the deterministic
    /// synthesizer.
    pub async fn build_schedule(
        &self,
        request: &WorkflowRequest,
    ) -> (Vec<StudyBlock>, ScheduleSource) {
        if let Some(client) = &self.client {
            let prompt = schedule_prompt(request);
            match client
                .generate(&prompt, SCHEDULE_MAX_TOKENS, SCHEDULE_TEMPERATURE)
                .await
            {
                Ok(text) => match parse_ai_schedule(&text) {
                    Ok(blocks) => return (blocks, ScheduleSource::Ai),
                    Err(e) => {
                        tracing::warn!(error = %e, "ai schedule rejected, using synthesizer");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "schedule generation failed, using synthesizer");
                }
            }
        }
        (synthesize(request), ScheduleSource::Fallback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use focusflow_core::{all_advice_texts, overlap_free, parse_workflow};

    #[test]
    fn no_config_means_fallback_mode() {
        let assistant = Assistant::new(None);
        assert!(!assistant.ai_enabled());
        assert_eq!(assistant.provider_name(), None);
        assert_eq!(assistant.model(), None);
    }

    #[test]
    fn blank_credential_degrades_instead_of_panicking() {
        let config = ProviderConfig {
            provider: crate::provider::Provider::Groq,
            api_key: String::new(),
            model: "llama3-8b-8192".into(),
        };
        let assistant = Assistant::new(Some(config));
        assert!(!assistant.ai_enabled());
    }

    #[tokio::test]
    async fn fallback_respond_is_deterministic_and_known() {
        let assistant = Assistant::new(None);
        let texts = all_advice_texts();

        let a = assistant.respond("tell me about pomodoro", &[]).await;
        let b = assistant.respond("tell me about pomodoro", &[]).await;
        assert_eq!(a, b);
        assert!(texts.iter().any(|t| *t == a));
        assert!(a.contains("25 minutes"));
    }

    #[tokio::test]
    async fn fallback_schedule_uses_synthesizer() {
        let assistant = Assistant::new(None);
        let request = parse_workflow("study Math and Physics, mornings, 1 week");

        let (blocks, source) = assistant.build_schedule(&request).await;
        assert_eq!(source, ScheduleSource::Fallback);
        assert!(!blocks.is_empty());
        assert!(overlap_free(&blocks));
        assert_eq!(blocks, synthesize(&request));
    }
}
