//! Pure domain services.

mod intent_classifier;

pub use intent_classifier::*;
