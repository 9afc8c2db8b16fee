use std::fmt;

use serde::{Deserialize, Serialize};

/// What the user wants, derived purely from the surface text of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Stop,
    AcknowledgeLaughter,
    RepeatTopic,
    NewTopic,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Stop => "stop",
            Intent::AcknowledgeLaughter => "acknowledge_laughter",
            Intent::RepeatTopic => "repeat_topic",
            Intent::NewTopic => "new_topic",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
