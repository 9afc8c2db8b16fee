use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::application::JokeGenerator;
use crate::domain::DomainError;

const JOKE_TEMPLATES: &[&str] = &[
    "Why did the {topic} go to therapy? It had too many unresolved issues.",
    "I tried to write a joke about {topic}, but it kept getting rate limited.",
    "{topic} walks into a bar. The bartender says: \"We don't serve your kind here.\" {topic} says: \"That's fine, I'm just here for the punchline.\"",
    "What do you call a {topic} with no sense of direction? Lost in translation.",
    "My therapist told me to embrace {topic}. Now I have a restraining order.",
    "How many {topic} experts does it take to change a light bulb? None, they just call it a feature.",
    "I'd tell you a joke about {topic}, but you'd have to be there.",
];

/// Offline [`JokeGenerator`] that fills canned templates with the topic.
///
/// The template is drawn from an RNG seeded by the topic and a call counter,
/// so a fresh process replays the same sequence. Repeats are likely, which
/// makes it handy for exercising the dedupe loop.
pub struct MockJokeGenerator {
    calls: AtomicU64,
}

impl MockJokeGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    fn pick_template(&self, topic: &str) -> &'static str {
        let mut hasher = DefaultHasher::new();
        topic.hash(&mut hasher);
        let seed = hasher.finish() ^ self.calls.fetch_add(1, Ordering::Relaxed);

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        JOKE_TEMPLATES[rng.gen_range(0..JOKE_TEMPLATES.len())]
    }
}

impl Default for MockJokeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JokeGenerator for MockJokeGenerator {
    async fn generate(&self, topic: &str) -> Result<String, DomainError> {
        let joke = self.pick_template(topic).replace("{topic}", topic);
        debug!("Mock generator produced: {}", joke);
        Ok(joke)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
