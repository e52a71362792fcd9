//! Provider selection.
//!
//! Credentials are inspected exactly once at process start, in a fixed
//! preference order: Gemini first, then Groq, else none. The result is an
//! explicit configuration value that gets injected into the client and the
//! health endpoint — nothing reads ambient environment state at call time.

use serde::Serialize;

/// Default Gemini model.
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Groq model.
const GROQ_MODEL: &str = "llama3-8b-8192";

/// A supported AI text-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Groq,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Groq => "groq",
        }
    }

    /// The model this deployment pins for the provider.
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => GEMINI_MODEL,
            Provider::Groq => GROQ_MODEL,
        }
    }
}

/// Resolved configuration for the active provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
}

impl ProviderConfig {
    /// Pick a provider from the available credentials.
    ///
    /// Preference order is fixed: Gemini, then Groq. Blank credentials
    /// count as absent. Returns `None` when neither is set — the system
    /// then runs in fallback mode.
    pub fn select(gemini_key: Option<String>, groq_key: Option<String>) -> Option<Self> {
        let present = |key: Option<String>| key.filter(|k| !k.trim().is_empty());

        if let Some(api_key) = present(gemini_key) {
            return Some(Self {
                provider: Provider::Gemini,
                api_key,
                model: GEMINI_MODEL.to_owned(),
            });
        }
        if let Some(api_key) = present(groq_key) {
            return Some(Self {
                provider: Provider::Groq,
                api_key,
                model: GROQ_MODEL.to_owned(),
            });
        }
        None
    }

    /// Read `GEMINI_API_KEY` / `GROQ_API_KEY` and select a provider.
    pub fn from_env() -> Option<Self> {
        Self::select(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("GROQ_API_KEY").ok(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_is_preferred_when_both_are_set() {
        let config =
            ProviderConfig::select(Some("g-key".into()), Some("q-key".into())).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key, "g-key");
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn groq_is_selected_when_gemini_is_absent() {
        let config = ProviderConfig::select(None, Some("q-key".into())).unwrap();
        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.model, "llama3-8b-8192");
    }

    #[test]
    fn blank_credentials_count_as_absent() {
        assert!(ProviderConfig::select(Some("   ".into()), None).is_none());
        let config = ProviderConfig::select(Some("".into()), Some("q".into())).unwrap();
        assert_eq!(config.provider, Provider::Groq);
    }

    #[test]
    fn no_credentials_means_fallback_mode() {
        assert!(ProviderConfig::select(None, None).is_none());
    }
}
