mod anthropic_client;
mod chat_client;
mod flowise_client;
mod gemini_client;
mod in_memory_session_repository;
mod mock_joke_generator;
mod prompted_joke_generator;
mod scripted_joke_generator;

pub use anthropic_client::AnthropicClient;
pub use chat_client::*;
pub use flowise_client::*;
pub use gemini_client::GeminiClient;
pub use in_memory_session_repository::*;
pub use mock_joke_generator::*;
pub use prompted_joke_generator::*;
pub use scripted_joke_generator::*;
