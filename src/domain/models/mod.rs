mod conversation;
mod history_policy;
mod intent;
mod reply;

pub use conversation::*;
pub use history_policy::*;
pub use intent::*;
pub use reply::*;
