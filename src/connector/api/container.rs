use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatSessionUseCase, GenerateJokeUseCase, HandleRequestUseCase, JokeGenerator, RetryPolicy,
    SessionRepository,
};
use crate::cli::Provider;
use crate::connector::adapter::{
    AnthropicClient, ChatClient, FlowiseClient, GeminiClient, InMemorySessionRepository,
    MockJokeGenerator, PromptedJokeGenerator,
};
use crate::domain::{HistoryPolicy, IntentClassifier};

pub struct ContainerConfig {
    pub provider: Provider,
    pub flowise_url: String,
    /// Model override for Gemini and Anthropic; falls back to their env vars.
    pub model: Option<String>,
    /// Prompt template with a `{topic}` placeholder. Ignored by Flowise,
    /// whose workflow owns the prompt.
    pub prompt: Option<String>,
    /// Track seen replies per session and regenerate duplicates on "one more".
    pub dedupe: bool,
    /// Answer "haha", "lol" and friends instead of treating them as topics.
    pub laughter: bool,
    pub history_policy: HistoryPolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Mock,
            flowise_url: crate::connector::adapter::DEFAULT_FLOWISE_URL.to_string(),
            model: None,
            prompt: None,
            dedupe: false,
            laughter: false,
            history_policy: HistoryPolicy::default(),
        }
    }
}

pub struct Container {
    generate_use_case: Arc<GenerateJokeUseCase>,
    handler: Arc<HandleRequestUseCase>,
    sessions: Arc<dyn SessionRepository>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let generator: Arc<dyn JokeGenerator> = match config.provider {
            Provider::Mock => {
                debug!("Using mock joke generator");
                Arc::new(MockJokeGenerator::new())
            }
            Provider::Flowise => {
                let client = FlowiseClient::new(config.flowise_url.clone());
                debug!("Using Flowise workflow at {}", client.url());
                Arc::new(client)
            }
            Provider::Gemini => {
                let client = GeminiClient::from_env(config.model.as_deref())?;
                debug!("Using Gemini model {}", client.model());
                Self::prompted(Arc::new(client), config.prompt.as_deref())
            }
            Provider::Anthropic => {
                let client = AnthropicClient::from_env(config.model.as_deref());
                debug!("Using Anthropic-compatible endpoint {}", client.url());
                Self::prompted(Arc::new(client), config.prompt.as_deref())
            }
        };

        Ok(Self::with_generator(config, generator))
    }

    /// Wire everything around an already built generator.
    pub fn with_generator(config: ContainerConfig, generator: Arc<dyn JokeGenerator>) -> Self {
        // The workflow endpoint reports failures as plain non-200s; nothing to wait out.
        let retry_policy = if config.provider == Provider::Flowise {
            RetryPolicy::no_retry()
        } else {
            RetryPolicy::default()
        };

        let generate_use_case =
            Arc::new(GenerateJokeUseCase::new(generator).with_retry_policy(retry_policy));

        let handler = Arc::new(
            HandleRequestUseCase::new(generate_use_case.clone())
                .with_classifier(IntentClassifier::new().with_laughter(config.laughter))
                .with_history_policy(config.history_policy)
                .with_dedupe(config.dedupe),
        );

        Self {
            generate_use_case,
            handler,
            sessions: Arc::new(InMemorySessionRepository::new()),
        }
    }

    fn prompted(client: Arc<dyn ChatClient>, prompt: Option<&str>) -> Arc<dyn JokeGenerator> {
        let generator = PromptedJokeGenerator::new(client);
        match prompt {
            Some(template) => Arc::new(generator.with_template(template)),
            None => Arc::new(generator),
        }
    }

    pub fn generate_use_case(&self) -> Arc<GenerateJokeUseCase> {
        self.generate_use_case.clone()
    }

    pub fn handle_request_use_case(&self) -> Arc<HandleRequestUseCase> {
        self.handler.clone()
    }

    pub fn chat_session_use_case(&self) -> ChatSessionUseCase {
        ChatSessionUseCase::new(self.sessions.clone(), self.handler.clone())
    }

    pub fn generator_name(&self) -> &str {
        self.generate_use_case.generator_name()
    }
}
