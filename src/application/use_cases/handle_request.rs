use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{GenerateJokeUseCase, Generated};
use crate::domain::{
    ConversationState, DomainError, HistoryPolicy, Intent, IntentClassifier, Reply, ReplyKind,
    Turn,
};

/// Handles one user request against a session's conversation state.
///
/// | Intent              | Reply                                   |
/// |---------------------|-----------------------------------------|
/// | Stop                | fixed farewell                          |
/// | AcknowledgeLaughter | fixed prompt for more                   |
/// | RepeatTopic         | joke on `last_topic`, or "don't remember" |
/// | NewTopic            | `last_topic := text`, then a joke on it |
///
/// When the state tracks seen replies, repeat requests go through the
/// dedupe loop and every accepted joke is remembered. Which turns are
/// appended to history is decided by the [`HistoryPolicy`].
pub struct HandleRequestUseCase {
    classifier: IntentClassifier,
    generate: Arc<GenerateJokeUseCase>,
    history_policy: HistoryPolicy,
    dedupe: bool,
}

impl HandleRequestUseCase {
    pub fn new(generate: Arc<GenerateJokeUseCase>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            generate,
            history_policy: HistoryPolicy::default(),
            dedupe: false,
        }
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history_policy = policy;
        self
    }

    /// Sessions started through [`Self::new_state`] will track seen replies.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn history_policy(&self) -> HistoryPolicy {
        self.history_policy
    }

    pub fn dedupes(&self) -> bool {
        self.dedupe
    }

    /// Empty state for a new session, configured for this handler.
    pub fn new_state(&self) -> ConversationState {
        if self.dedupe {
            ConversationState::with_dedupe()
        } else {
            ConversationState::new()
        }
    }

    /// Handle `request` and update `state` in place.
    ///
    /// Blank input is ignored and yields `Ok(None)`. A new topic is stored
    /// before the generator is called, so it is kept even when generation
    /// fails; a failed turn is not appended to history.
    pub async fn execute(
        &self,
        state: &mut ConversationState,
        request: &str,
    ) -> Result<Option<Reply>, DomainError> {
        let text = request.trim();
        if text.is_empty() {
            debug!("Ignoring empty request");
            return Ok(None);
        }

        let intent = self.classifier.classify(text);
        debug!("Classified request as {}", intent);

        let reply = match intent {
            Intent::Stop => Reply::farewell(),
            Intent::AcknowledgeLaughter => Reply::laughter_ack(),
            Intent::RepeatTopic => match state.last_topic().map(str::to_owned) {
                None => Reply::no_topic(),
                Some(topic) => {
                    let generated = if state.tracks_seen_replies() {
                        self.generate.execute_unseen(&topic, state).await
                    } else {
                        self.generate.execute(&topic).await
                    };
                    self.accept(intent, Self::log_failure(generated)?, state)
                }
            },
            Intent::NewTopic => {
                state.set_last_topic(text);
                let generated = self.generate.execute(text).await;
                self.accept(intent, Self::log_failure(generated)?, state)
            }
        };

        debug!("Replying with {} to {} request", reply.kind().as_str(), intent);
        if self.history_policy.records(reply.kind()) {
            state.push_turn(Turn::new(text, reply.text()));
        }

        Ok(Some(reply))
    }

    fn accept(&self, intent: Intent, generated: Generated, state: &mut ConversationState) -> Reply {
        match generated {
            Generated::Joke(joke) => {
                state.remember_reply(joke.as_str());
                Reply::new(joke, intent, ReplyKind::Joke)
            }
            Generated::Repeated(joke) => Reply::new(joke, intent, ReplyKind::RepeatedJoke),
            Generated::Exhausted => Reply::out_of_jokes(intent),
        }
    }

    fn log_failure(result: Result<Generated, DomainError>) -> Result<Generated, DomainError> {
        if let Err(e) = &result {
            warn!("Joke generation failed: {}", e);
        }
        result
    }
}
