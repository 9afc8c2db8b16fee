mod joke_generator;
mod session_repository;

pub use joke_generator::*;
pub use session_repository::*;
