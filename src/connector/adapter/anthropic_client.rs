use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connector::adapter::{status_error, ChatClient};
use crate::domain::DomainError;

/// LM Studio on its standard port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234";
pub const DEFAULT_MODEL: &str = "ministral-3b-2512";

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// A joke fits comfortably; longer answers are cut off by the server.
const MAX_TOKENS: u32 = 256;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: String,
}

/// Client for the Anthropic Messages API and servers that mimic it.
///
/// Defaults target a local LM Studio without an API key. Point
/// `ANTHROPIC_BASE_URL` at `https://api.anthropic.com` and set
/// `ANTHROPIC_API_KEY` to use the hosted API.
///
/// For loopback hosts a 2-second `HEAD /` runs before each request so a
/// local server that is not running fails fast. Remote hosts skip it.
pub struct AnthropicClient {
    client: reqwest::Client,
    /// Present only for loopback base URLs.
    reachability: Option<(reqwest::Client, String)>,
    api_key: String,
    model: String,
    url: String,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let base = base.trim_end_matches('/');

        let reachability = is_loopback(base).then(|| {
            let client = reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(2))
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default();
            (client, format!("{base}/"))
        });

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            reachability,
            api_key: api_key.into(),
            model: model.into(),
            url: format!("{base}{MESSAGES_PATH}"),
        }
    }

    /// Reads `ANTHROPIC_BASE_URL`, `ANTHROPIC_MODEL` and `ANTHROPIC_API_KEY`.
    /// An explicit `model` wins over the environment.
    pub fn from_env(model: Option<&str>) -> Self {
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = model.map(str::to_string).unwrap_or_else(|| {
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        });
        let key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        Self::new(key, model, base)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn checks_reachability(&self) -> bool {
        self.reachability.is_some()
    }

    async fn ensure_reachable(&self) -> Result<(), DomainError> {
        let Some((client, base)) = &self.reachability else {
            return Ok(());
        };

        // Any HTTP status means something is listening.
        match client.head(base).send().await {
            Err(e) if e.is_connect() || e.is_timeout() => Err(DomainError::provider(format!(
                "AnthropicClient: nothing listening at {}: {e}",
                base.trim_end_matches('/')
            ))),
            _ => Ok(()),
        }
    }
}

fn is_loopback(base: &str) -> bool {
    reqwest::Url::parse(base)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .is_some_and(|host| {
            host == "localhost"
                || host
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .parse::<std::net::IpAddr>()
                    .is_ok_and(|ip| ip.is_loopback())
        })
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
        self.ensure_reachable().await?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserMessage {
                role: "user",
                content: user,
            }],
        };
        debug!("AnthropicClient: POST {} (model {})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("AnthropicClient: request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DomainError::provider(format!("AnthropicClient: failed to read response: {e}"))
        })?;

        if !status.is_success() {
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(status_error("AnthropicClient", status, &body));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            DomainError::provider(format!("AnthropicClient: failed to parse response: {e}"))
        })?;

        Ok(parsed.content.into_iter().map(|block| block.text).collect())
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
