use serde::{Deserialize, Serialize};

use super::Intent;

pub const FAREWELL_REPLY: &str =
    "Thanks for your patience! Let me know if you need more jokes later 😊.";
pub const NO_TOPIC_REPLY: &str =
    "I don't remember the last topic! Please ask for a joke first. 😊";
pub const LAUGHTER_REPLY: &str =
    "Glad you liked it! 😄 Want another one? Just say \"one more\".";
pub const OUT_OF_JOKES_REPLY: &str =
    "Oops! I'm out of jokes for now. Please try again in a little while. 😅";

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Farewell,
    LaughterAck,
    NoTopic,
    /// Fresh text from the generator.
    Joke,
    /// Every dedupe attempt collided; the last (already seen) joke is shown.
    RepeatedJoke,
    /// Rate-limit retries were exhausted.
    OutOfJokes,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyKind::Farewell => "farewell",
            ReplyKind::LaughterAck => "laughter_ack",
            ReplyKind::NoTopic => "no_topic",
            ReplyKind::Joke => "joke",
            ReplyKind::RepeatedJoke => "repeated_joke",
            ReplyKind::OutOfJokes => "out_of_jokes",
        }
    }

    /// Whether producing this reply involved a call to the generator.
    pub fn is_generated(&self) -> bool {
        matches!(
            self,
            ReplyKind::Joke | ReplyKind::RepeatedJoke | ReplyKind::OutOfJokes
        )
    }
}

/// Text shown to the user for one handled request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    text: String,
    intent: Intent,
    kind: ReplyKind,
}

impl Reply {
    pub fn new(text: impl Into<String>, intent: Intent, kind: ReplyKind) -> Self {
        Self {
            text: text.into(),
            intent,
            kind,
        }
    }

    pub fn farewell() -> Self {
        Self::new(FAREWELL_REPLY, Intent::Stop, ReplyKind::Farewell)
    }

    pub fn laughter_ack() -> Self {
        Self::new(
            LAUGHTER_REPLY,
            Intent::AcknowledgeLaughter,
            ReplyKind::LaughterAck,
        )
    }

    pub fn no_topic() -> Self {
        Self::new(NO_TOPIC_REPLY, Intent::RepeatTopic, ReplyKind::NoTopic)
    }

    pub fn out_of_jokes(intent: Intent) -> Self {
        Self::new(OUT_OF_JOKES_REPLY, intent, ReplyKind::OutOfJokes)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn kind(&self) -> ReplyKind {
        self.kind
    }
}
