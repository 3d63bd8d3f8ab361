//! Gemini client over the `generateContent` REST endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{GenerationConfig, GenerativeModel, ModelError};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro-exp-0827";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const RESPONSE_MIME_TYPE: &str = "application/json";

/// Gemini `generateContent` client.
///
/// Owns a connection pool; build once and share. The response MIME type is
/// pinned to JSON so the model answers with a bare object rather than
/// prose.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    config: GenerationConfig,
    timeout: Option<Duration>,
}

// ── Wire shapes ──

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    /// Absent on safety-blocked candidates; yields empty text downstream.
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// ── Client ──

impl GeminiClient {
    /// Client for the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Client for a specific model id.
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            config: GenerationConfig::default(),
            timeout: None,
        }
    }

    /// Override the sampling config.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound each request; without one the call waits on the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: WireGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        }
    }
}

/// Pull the answer text out of a decoded response: first candidate, its
/// parts concatenated.
fn candidate_text(response: GenerateResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ModelError::NoCandidates)?;
    Ok(candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect())
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);

        debug!(model = %self.model, prompt_bytes = prompt.len(), "calling generateContent");
        let mut request = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request_body(prompt));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateResponse = resp.json().await?;
        candidate_text(decoded)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_contract() {
        let client = GeminiClient::new("test-key");
        let body = serde_json::to_value(client.request_body("order a pie")).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "order a pie");
        assert_eq!(body["generationConfig"]["temperature"], 0.3);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn config_override_lands_in_body() {
        let client = GeminiClient::new("test-key").with_config(GenerationConfig {
            temperature: 0.0,
            max_output_tokens: 256,
        });
        let body = serde_json::to_value(client.request_body("hi")).unwrap();
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn candidate_text_concatenates_parts() {
        let decoded: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "{\"assistantMessage\""}, {"text": ": \"hi\"}"}]
                    }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(
            candidate_text(decoded).unwrap(),
            r#"{"assistantMessage": "hi"}"#
        );
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let decoded: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            candidate_text(decoded),
            Err(ModelError::NoCandidates)
        ));
    }

    #[test]
    fn default_model_is_used_without_override() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.model_name(), DEFAULT_MODEL);
    }
}
