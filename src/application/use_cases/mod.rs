mod chat_session;
mod generate_joke;
mod handle_request;
mod retry_policy;

pub use chat_session::*;
pub use generate_joke::*;
pub use handle_request::*;
pub use retry_policy::*;
