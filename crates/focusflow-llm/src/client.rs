//! Single-shot AI provider client.
//!
//! Supports the **Gemini generateContent API** and the **Groq chat
//! completions API** (OpenAI-compatible). One call to [`AiClient::generate`]
//! performs exactly one outbound HTTP request with a bounded timeout and no
//! retries — on any failure the caller falls back to deterministic
//! generation, so a failed call here is never fatal to a request.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::error::{LlmError, Result};
use crate::provider::{Provider, ProviderConfig};

/// Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Groq API base URL (OpenAI-compatible).
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Upper bound on one provider call. Timeouts are treated like any other
/// provider failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A client bound to one selected provider.
#[derive(Debug, Clone)]
pub struct AiClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl AiClient {
    /// Create a client for the selected provider.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// Which provider this client targets.
    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    /// Model identifier this client requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `prompt` to the provider and return the generated text.
    ///
    /// Exactly one attempt; the caller decides what to do on failure.
    /// An empty or whitespace-only completion is reported as
    /// [`LlmError::EmptyResponse`].
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let text = match self.config.provider {
            Provider::Gemini => self.generate_gemini(prompt, max_tokens, temperature).await?,
            Provider::Groq => self.generate_groq(prompt, max_tokens, temperature).await?,
        };

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    // -- Gemini --------------------------------------------------------------

    async fn generate_gemini(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.config.model, self.config.api_key
        );
        let body = build_gemini_request_body(prompt, max_tokens, temperature);

        tracing::debug!(model = %self.config.model, provider = "gemini", "sending provider request");

        let resp = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await?;

        let v = read_json_body(resp).await?;
        parse_gemini_response(&v)
    }

    // -- Groq ----------------------------------------------------------------

    async fn generate_groq(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let url = format!("{GROQ_BASE_URL}/chat/completions");
        let body = build_groq_request_body(&self.config.model, prompt, max_tokens, temperature);

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(model = %self.config.model, provider = "groq", "sending provider request");

        let resp = self.http.post(&url).headers(headers).json(&body).send().await?;

        let v = read_json_body(resp).await?;
        parse_groq_response(&v)
    }
}

/// Read a response body, mapping non-success statuses to `RequestFailed`.
async fn read_json_body(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| LlmError::RequestFailed {
        reason: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        return Err(LlmError::RequestFailed {
            reason: format!("API returned {status}: {text}"),
        });
    }

    serde_json::from_str(&text).map_err(|e| LlmError::ParseFailed {
        reason: format!("invalid JSON response: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Wire format (free functions, unit-testable)
// ---------------------------------------------------------------------------

/// Build the JSON body for the Gemini `generateContent` endpoint.
pub fn build_gemini_request_body(prompt: &str, max_tokens: u32, temperature: f32) -> Value {
    json!({
        "contents": [{
            "parts": [{"text": prompt}],
        }],
        "generationConfig": {
            "maxOutputTokens": max_tokens,
            "temperature": temperature,
        },
    })
}

/// Build the JSON body for the Groq (OpenAI-compatible) chat completions
/// endpoint. The whole prompt travels as a single user message.
pub fn build_groq_request_body(
    model: &str,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "max_tokens": max_tokens,
        "temperature": temperature,
    })
}

/// Extract the generated text from a Gemini response.
pub fn parse_gemini_response(v: &Value) -> Result<String> {
    let parts = v["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| LlmError::ParseFailed {
            reason: "missing `candidates[0].content.parts` in response".into(),
        })?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");

    Ok(text)
}

/// Extract the generated text from a Groq chat completions response.
pub fn parse_groq_response(v: &Value) -> Result<String> {
    let message = &v["choices"][0]["message"];
    if message.is_null() {
        return Err(LlmError::ParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }
    Ok(message["content"].as_str().unwrap_or_default().to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: Provider) -> ProviderConfig {
        ProviderConfig {
            provider,
            api_key: "test-key".into(),
            model: provider.default_model().to_owned(),
        }
    }

    #[test]
    fn empty_api_key_returns_error() {
        let mut c = config(Provider::Gemini);
        c.api_key = String::new();
        assert!(matches!(AiClient::new(c), Err(LlmError::NotConfigured)));
    }

    #[test]
    fn client_reports_provider_and_model() {
        let client = AiClient::new(config(Provider::Groq)).unwrap();
        assert_eq!(client.provider(), Provider::Groq);
        assert_eq!(client.model(), "llama3-8b-8192");
    }

    #[test]
    fn gemini_request_body_shape() {
        let body = build_gemini_request_body("Hello", 500, 0.7);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
        let temp = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 1e-6);
    }

    #[test]
    fn groq_request_body_shape() {
        let body = build_groq_request_body("llama3-8b-8192", "Hello", 500, 0.5);
        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn parse_gemini_text_response() {
        let v = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hello, "}, {"text": "world!"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(parse_gemini_response(&v).unwrap(), "Hello, world!");
    }

    #[test]
    fn parse_gemini_missing_candidates_is_error() {
        let v = json!({"error": {"code": 400, "message": "bad request"}});
        assert!(matches!(
            parse_gemini_response(&v),
            Err(LlmError::ParseFailed { .. })
        ));
    }

    #[test]
    fn parse_groq_text_response() {
        let v = json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi from Groq"},
                "finish_reason": "stop"
            }]
        });
        assert_eq!(parse_groq_response(&v).unwrap(), "Hi from Groq");
    }

    #[test]
    fn parse_groq_missing_message_is_error() {
        let v = json!({"choices": []});
        assert!(matches!(
            parse_groq_response(&v),
            Err(LlmError::ParseFailed { .. })
        ));
    }
}
