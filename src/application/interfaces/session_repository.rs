use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ConversationState, DomainError};

/// Storage for per-session [`ConversationState`], keyed by session id.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a fresh state and return the new session id.
    async fn create(&self, state: ConversationState) -> Result<Uuid, DomainError>;

    async fn load(&self, id: Uuid) -> Result<Option<ConversationState>, DomainError>;

    /// Replace the state of an existing session. Fails with `NotFound` when
    /// the session was never created or already ended.
    async fn save(&self, id: Uuid, state: ConversationState) -> Result<(), DomainError>;

    /// Returns whether a session was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
