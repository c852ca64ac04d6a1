//! Task-idea generation backed by the Gemini generateContent API.
//!
//! The capability is modeled as a two-variant enum rather than a
//! nullable client so every caller has to handle the unconfigured
//! case. Construction resolves the credential exactly once; an app
//! that starts without a key stays without one.

use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Default endpoint of the generative-language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for idea generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// The fixed prompt. One short actionable item, hard word cap, so the
/// response drops straight into the new-task input.
const IDEA_PROMPT: &str = "Suggest a single, short, and creative to-do list item or \
     reminder. The task should be interesting and actionable. Maximum 10 words.";

/// User-facing failures of the idea feature. The `Display` text is
/// what the frontend shows; root causes go to the log only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdeaError {
    /// No credential was available when the generator was built.
    #[error("The idea service is not configured. Set GEMINI_API_KEY to enable suggestions.")]
    NotConfigured,

    /// The single outbound attempt failed: transport, HTTP status, or
    /// an unusable response body.
    #[error("Failed to get an idea right now. Please try again later.")]
    GenerationFailed,
}

/// Connection details for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Point the client somewhere else; used by the contract tests to
    /// target a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// One-shot Gemini text-generation client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Ask for one task idea. A single best-effort request: no retry,
    /// no backoff, no timeout beyond the transport's own.
    pub async fn generate_idea(&self) -> Result<String, IdeaError> {
        let request_id = Uuid::new_v4();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": IDEA_PROMPT }],
            }],
        });

        tracing::debug!(%request_id, model = %self.config.model, "requesting task idea");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(%request_id, error = %err, "idea request failed to send");
                IdeaError::GenerationFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                %request_id,
                status = %status,
                detail = %extract_error_message(&body),
                "idea request returned an error status"
            );
            return Err(IdeaError::GenerationFailed);
        }

        let payload: serde_json::Value = response.json().await.map_err(|err| {
            tracing::error!(%request_id, error = %err, "idea response body was not JSON");
            IdeaError::GenerationFailed
        })?;

        let Some(raw) = extract_candidate_text(&payload) else {
            tracing::error!(%request_id, "idea response had no candidate text");
            return Err(IdeaError::GenerationFailed);
        };

        let idea = clean_idea_text(&raw);
        if idea.is_empty() {
            tracing::error!(%request_id, "idea response cleaned to an empty string");
            return Err(IdeaError::GenerationFailed);
        }

        tracing::info!(%request_id, idea = %idea, "generated task idea");
        Ok(idea)
    }
}

/// The idea capability: either a working client or a terminal
/// not-configured state.
#[derive(Debug, Clone)]
pub enum IdeaGenerator {
    Configured(GeminiClient),
    NotConfigured,
}

impl IdeaGenerator {
    /// Build from an optional explicit key, consulting the
    /// environment when none is given.
    pub fn from_key(explicit: Option<String>, model: &str) -> Self {
        match config::resolve_api_key(explicit) {
            Some(key) => Self::Configured(GeminiClient::new(GeminiConfig::new(key, model))),
            None => {
                tracing::error!("no Gemini API key available; idea generation disabled");
                Self::NotConfigured
            }
        }
    }

    /// Build from the environment alone.
    pub fn from_env(model: &str) -> Self {
        Self::from_key(None, model)
    }

    /// Build around an already-configured client; the contract tests
    /// use this with a mock base URL.
    pub fn configured(client: GeminiClient) -> Self {
        Self::Configured(client)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Generate one idea, or fail before any network attempt when
    /// unconfigured.
    pub async fn generate(&self) -> Result<String, IdeaError> {
        match self {
            Self::Configured(client) => client.generate_idea().await,
            Self::NotConfigured => Err(IdeaError::NotConfigured),
        }
    }
}

/// Pull the first candidate's text parts out of a generateContent
/// response.
fn extract_candidate_text(payload: &serde_json::Value) -> Option<String> {
    let parts = payload
        .pointer("/candidates/0/content/parts")?
        .as_array()?;

    let mut text = String::new();
    for part in parts {
        if let Some(piece) = part.get("text").and_then(|t| t.as_str()) {
            text.push_str(piece);
        }
    }

    if text.is_empty() { None } else { Some(text) }
}

/// Models wrap suggestions in quotes or markdown emphasis; strip both
/// and trim.
fn clean_idea_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '"' && *c != '*')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Human-readable detail from an API error body, for the log.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no response body".to_string()
            } else {
                body.chars().take(500).collect()
            }
        })
}
