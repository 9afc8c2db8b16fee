use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::JokeGenerator;
use crate::connector::adapter::ChatClient;
use crate::domain::DomainError;

/// Placeholder replaced with the user's topic.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

pub const DEFAULT_PROMPT: &str =
    "Tell me a short, family-friendly, funny joke about {topic}. Reply with the joke only.";

/// System prompt keeping the model in character.
const SYSTEM_PROMPT: &str = "\
You are JokeBot, a cheerful comedian. You answer every request with exactly one \
original joke about the requested topic. Keep it short (at most three sentences), \
avoid offensive content, and never explain the joke.";

/// A [`JokeGenerator`] that renders a prompt template for the topic and sends
/// it through any [`ChatClient`].
pub struct PromptedJokeGenerator {
    client: Arc<dyn ChatClient>,
    template: String,
}

impl PromptedJokeGenerator {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            template: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Use a custom template. A template without `{topic}` gets the topic
    /// appended on its own line.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn render(&self, topic: &str) -> String {
        if self.template.contains(TOPIC_PLACEHOLDER) {
            self.template.replace(TOPIC_PLACEHOLDER, topic)
        } else {
            format!("{}\n{}", self.template, topic)
        }
    }
}

#[async_trait]
impl JokeGenerator for PromptedJokeGenerator {
    async fn generate(&self, topic: &str) -> Result<String, DomainError> {
        let prompt = self.render(topic);
        debug!("{} prompt: {}", self.client.name(), prompt);

        let text = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        let joke = text.trim();
        if joke.is_empty() {
            return Err(DomainError::provider(format!(
                "{}: empty response",
                self.client.name()
            )));
        }
        Ok(joke.to_string())
    }

    fn name(&self) -> &str {
        self.client.name()
    }
}
