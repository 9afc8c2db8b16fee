use serde::{Deserialize, Serialize};

use super::ReplyKind;

/// Which handled turns are appended to a session's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryPolicy {
    /// Every handled request, including farewells and other fixed replies.
    #[default]
    AllTurns,
    /// Only turns that went through the generator.
    GenerationOnly,
}

impl HistoryPolicy {
    pub fn records(&self, kind: ReplyKind) -> bool {
        match self {
            HistoryPolicy::AllTurns => true,
            HistoryPolicy::GenerationOnly => kind.is_generated(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPolicy::AllTurns => "all-turns",
            HistoryPolicy::GenerationOnly => "generation-only",
        }
    }
}

impl std::str::FromStr for HistoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all-turns" | "all" => Ok(HistoryPolicy::AllTurns),
            "generation-only" | "generation" => Ok(HistoryPolicy::GenerationOnly),
            other => Err(format!("unknown history policy: {other}")),
        }
    }
}
