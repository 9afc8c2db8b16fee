use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::JokeGenerator;
use crate::domain::DomainError;

pub const DEFAULT_FLOWISE_URL: &str = "http://localhost:3000/api/v1/prediction/jokebot";

/// Shown when the workflow answers 200 without a `text` field.
pub const MISSING_TEXT_REPLY: &str = "Oops! Couldn't fetch a joke.";

#[derive(Serialize)]
struct PredictionRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct PredictionResponse {
    text: Option<String>,
}

/// [`JokeGenerator`] backed by a Flowise prediction endpoint.
///
/// The workflow owns the prompt, so the topic is posted as-is in
/// `{"question": ...}`. Any status other than 200 is a provider error and is
/// never retried.
pub struct FlowiseClient {
    client: reqwest::Client,
    url: String,
}

impl FlowiseClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn parse_prediction(body: &str) -> Result<String, DomainError> {
        let prediction: PredictionResponse = serde_json::from_str(body).map_err(|e| {
            DomainError::provider(format!("FlowiseClient: failed to parse response: {e}"))
        })?;
        Ok(prediction
            .text
            .unwrap_or_else(|| MISSING_TEXT_REPLY.to_string()))
    }
}

#[async_trait]
impl JokeGenerator for FlowiseClient {
    async fn generate(&self, topic: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .post(&self.url)
            .json(&PredictionRequest { question: topic })
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("FlowiseClient: request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DomainError::provider(format!("FlowiseClient: failed to read response: {e}"))
        })?;

        if status != reqwest::StatusCode::OK {
            warn!("FlowiseClient: {} returned {status}: {body}", self.url);
            return Err(DomainError::provider(format!(
                "FlowiseClient: workflow returned {status}"
            )));
        }

        Self::parse_prediction(&body)
    }

    fn name(&self) -> &str {
        "flowise"
    }
}
