pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    Backoff, ChatSessionUseCase, GenerateJokeUseCase, Generated, HandleRequestUseCase,
    JokeGenerator, RetryPolicy, SessionRepository,
};

pub use cli::{Commands, Provider};

pub use connector::{
    AnthropicClient, ChatClient, FlowiseClient, GeminiClient, InMemorySessionRepository,
    MockJokeGenerator, PromptedJokeGenerator, ScriptedJokeGenerator,
};

pub use domain::{
    ConversationState, DomainError, HistoryPolicy, Intent, IntentClassifier, Reply, ReplyKind,
    Turn,
};
