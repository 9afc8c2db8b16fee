use crate::domain::Intent;

/// Substrings that end the joke session wherever they appear.
const STOP_PHRASES: &[&str] = &["stop", "no more jokes", "enough"];

/// Whole-message reactions to a joke.
const LAUGHTER_PHRASES: &[&str] = &["lol", "haha", "hehe", "funny", "😂", "🤣", "😆", "😄"];

/// Whole-message requests for another joke on the previous topic.
const REPEAT_PHRASES: &[&str] = &["one more", "another one", "again", "yes", "yes please"];

/// Maps raw request text to an [`Intent`] by matching against fixed phrase
/// sets. Checks run in order (stop, laughter, repeat) and the first match
/// wins; anything else is a new topic.
///
/// Laughter acknowledgment is opt-in. With it disabled, "haha" is just a
/// topic like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier {
    acknowledge_laughter: bool,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_laughter(mut self, enabled: bool) -> Self {
        self.acknowledge_laughter = enabled;
        self
    }

    pub fn acknowledges_laughter(&self) -> bool {
        self.acknowledge_laughter
    }

    pub fn classify(&self, text: &str) -> Intent {
        let normalized = text.trim().to_lowercase();

        if STOP_PHRASES.iter().any(|p| normalized.contains(p)) {
            return Intent::Stop;
        }

        if self.acknowledge_laughter && LAUGHTER_PHRASES.contains(&normalized.as_str()) {
            return Intent::AcknowledgeLaughter;
        }

        if REPEAT_PHRASES.contains(&normalized.as_str()) {
            return Intent::RepeatTopic;
        }

        Intent::NewTopic
    }
}
