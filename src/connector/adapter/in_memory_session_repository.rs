use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::SessionRepository;
use crate::domain::{ConversationState, DomainError};

/// Upper bound on live sessions before the least recently used one is dropped.
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

struct Entry {
    state: ConversationState,
    last_seen: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, Entry>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.entries.remove(&id);
            info!("Session store full, evicted idle session {}", id);
        }
    }
}

/// Keeps every session's state in process memory. Sessions disappear when
/// the process exits.
///
/// The store holds at most `capacity` sessions. Creating one more evicts
/// the session that was loaded or saved least recently.
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<Sessions>>,
    capacity: usize,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, state: ConversationState) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;

        while sessions.entries.len() >= self.capacity {
            sessions.evict_least_recent();
        }

        let last_seen = sessions.tick();
        sessions.entries.insert(id, Entry { state, last_seen });
        debug!("Created session {} in memory", id);
        Ok(id)
    }

    async fn load(&self, id: Uuid) -> Result<Option<ConversationState>, DomainError> {
        let mut sessions = self.sessions.lock().await;
        let now = sessions.tick();
        Ok(sessions.entries.get_mut(&id).map(|entry| {
            entry.last_seen = now;
            entry.state.clone()
        }))
    }

    async fn save(&self, id: Uuid, state: ConversationState) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().await;
        let now = sessions.tick();
        match sessions.entries.get_mut(&id) {
            Some(entry) => {
                entry.state = state;
                entry.last_seen = now;
                Ok(())
            }
            None => Err(DomainError::not_found(format!("session {id}"))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.sessions.lock().await.entries.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.sessions.lock().await.entries.len())
    }
}
