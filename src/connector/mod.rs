//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Joke generation (Flowise, Gemini, Anthropic, offline mock)
//! - Session storage (in-memory)
//! - Front-ends (CLI container/router, axum web form)

pub mod adapter;
pub mod api;
pub mod web;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
