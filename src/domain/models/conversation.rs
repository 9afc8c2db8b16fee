use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One exchange: what the user typed and what the bot answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    user: String,
    bot: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn bot(&self) -> &str {
        &self.bot
    }
}

/// Per-session conversation memory.
///
/// Created empty when a session starts, mutated by every handled request and
/// dropped when the session ends. Nothing here is persisted.
///
/// `seen_replies` is only tracked when the session was created with reply
/// deduplication enabled; otherwise it stays `None` and
/// [`ConversationState::remember_reply`] is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    last_topic: Option<String>,
    history: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seen_replies: Option<HashSet<String>>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state that also tracks previously generated replies.
    pub fn with_dedupe() -> Self {
        Self {
            seen_replies: Some(HashSet::new()),
            ..Self::default()
        }
    }

    pub fn last_topic(&self) -> Option<&str> {
        self.last_topic.as_deref()
    }

    pub fn set_last_topic(&mut self, topic: impl Into<String>) {
        self.last_topic = Some(topic.into());
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    pub fn tracks_seen_replies(&self) -> bool {
        self.seen_replies.is_some()
    }

    pub fn has_seen(&self, reply: &str) -> bool {
        self.seen_replies
            .as_ref()
            .is_some_and(|seen| seen.contains(reply))
    }

    /// Record a reply as seen. Returns `false` if it was already known or
    /// the state does not track replies.
    pub fn remember_reply(&mut self, reply: impl Into<String>) -> bool {
        match self.seen_replies.as_mut() {
            Some(seen) => seen.insert(reply.into()),
            None => false,
        }
    }

    pub fn seen_reply_count(&self) -> usize {
        self.seen_replies.as_ref().map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.last_topic.is_none() && self.history.is_empty() && self.seen_reply_count() == 0
    }
}
