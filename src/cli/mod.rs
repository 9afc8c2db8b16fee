use clap::{Subcommand, ValueEnum};

/// Backend that turns a topic into a joke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Offline canned jokes, no network
    Mock,
    /// Flowise prediction endpoint (`--flowise-url`)
    Flowise,
    /// Google Gemini `generateContent` (`GEMINI_API_KEY`)
    Gemini,
    /// Anthropic Messages API or a compatible local server
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mock => "mock",
            Provider::Flowise => "flowise",
            Provider::Gemini => "gemini",
            Provider::Anthropic => "anthropic",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask for a single joke and exit
    Ask {
        /// Topic, or any other request ("one more" has nothing to repeat here)
        text: String,
    },

    /// Interactive chat on stdin; `/quit` or EOF to leave
    Chat,

    /// Serve the web form and JSON API
    Serve {
        #[arg(long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },
}
