use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::JokeGenerator;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
enum Step {
    Joke(String),
    RateLimited,
    Failure(String),
}

/// [`JokeGenerator`] that plays back a fixed script of results and records
/// every topic it was asked about. Used to drive handlers in tests and demos
/// without a network.
///
/// Once the script runs out every call fails with a provider error.
pub struct ScriptedJokeGenerator {
    steps: Mutex<VecDeque<Step>>,
    topics: Mutex<Vec<String>>,
}

impl ScriptedJokeGenerator {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            topics: Mutex::new(Vec::new()),
        }
    }

    fn then(self, step: Step) -> Self {
        self.steps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(step);
        self
    }

    pub fn then_joke(self, joke: impl Into<String>) -> Self {
        self.then(Step::Joke(joke.into()))
    }

    pub fn then_rate_limited(self) -> Self {
        self.then(Step::RateLimited)
    }

    pub fn then_failure(self, message: impl Into<String>) -> Self {
        self.then(Step::Failure(message.into()))
    }

    pub fn call_count(&self) -> usize {
        self.topics.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Topics in the order they were requested.
    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for ScriptedJokeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JokeGenerator for ScriptedJokeGenerator {
    async fn generate(&self, topic: &str) -> Result<String, DomainError> {
        self.topics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(topic.to_string());

        let step = self
            .steps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match step {
            Some(Step::Joke(joke)) => Ok(joke),
            Some(Step::RateLimited) => Err(DomainError::rate_limited("scripted 429")),
            Some(Step::Failure(message)) => Err(DomainError::provider(message)),
            None => Err(DomainError::provider("script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
