//! Google Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::connector::adapter::{status_error, ChatClient};
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini service implementation.
///
/// The API key travels in the `x-goog-api-key` header. Quota refusals come
/// back as HTTP 429 with `"status": "RESOURCE_EXHAUSTED"` and are reported as
/// rate limits.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: &str) -> Self {
        let model: String = model.into();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model,
            url,
        }
    }

    /// Reads `GEMINI_API_KEY` (falling back to `GOOGLE_API_KEY`),
    /// `GEMINI_BASE_URL` and `GEMINI_MODEL`. Returns an error when no key is set.
    pub fn from_env(model: Option<&str>) -> Result<Self, DomainError> {
        let key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                DomainError::invalid_input("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set")
            })?;
        let base =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = model.map(str::to_string).unwrap_or_else(|| {
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        });
        Ok(Self::new(key, model, &base))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(system: &'a str, user: &'a str) -> GeminiRequest<'a> {
        GeminiRequest {
            system_instruction: (!system.is_empty()).then(|| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system }],
            }),
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart { text: user }],
            }],
        }
    }

    fn extract_text(resp: GeminiResponse) -> Result<String, DomainError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("GeminiClient: no candidates in response"))?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(system, user))
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("GeminiClient: request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::provider(format!("GeminiClient: failed to read response: {e}")))?;

        if !status.is_success() {
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(status_error("GeminiClient", status, &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            DomainError::provider(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        Self::extract_text(parsed)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_targets_generate_content() {
        let client = GeminiClient::new("k", "gemini-2.0-flash", "https://example.test/");
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_shape_matches_api() {
        let value = serde_json::to_value(GeminiClient::build_request("be funny", "cats")).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "be funny" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "cats" }] }]
            })
        );
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let value = serde_json::to_value(GeminiClient::build_request("", "cats")).unwrap();
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn extract_text_joins_parts() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Why " }, { "text": "not?" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(GeminiClient::extract_text(resp).unwrap(), "Why not?");
    }

    #[test]
    fn missing_candidates_is_provider_error() {
        let resp: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(GeminiClient::extract_text(resp).unwrap_err().is_provider_error());
    }
}
