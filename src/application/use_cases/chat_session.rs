use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::{HandleRequestUseCase, SessionRepository};
use crate::domain::{ConversationState, DomainError, Reply, Turn};

/// Session-scoped wrapper around [`HandleRequestUseCase`] for front-ends
/// that serve more than one user.
///
/// Each call loads the session's state, hands it to the handler and stores
/// it back. The state is saved even when generation fails so a freshly
/// submitted topic is not lost.
pub struct ChatSessionUseCase {
    sessions: Arc<dyn SessionRepository>,
    handler: Arc<HandleRequestUseCase>,
}

impl ChatSessionUseCase {
    pub fn new(sessions: Arc<dyn SessionRepository>, handler: Arc<HandleRequestUseCase>) -> Self {
        Self { sessions, handler }
    }

    pub async fn start(&self) -> Result<Uuid, DomainError> {
        let id = self.sessions.create(self.handler.new_state()).await?;
        info!("Started session {}", id);
        Ok(id)
    }

    pub async fn state(&self, id: Uuid) -> Result<ConversationState, DomainError> {
        self.sessions
            .load(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("session {id}")))
    }

    pub async fn send(&self, id: Uuid, text: &str) -> Result<Option<Reply>, DomainError> {
        let mut state = self.state(id).await?;
        debug!("Session {} received: {}", id, text);

        let result = self.handler.execute(&mut state, text).await;
        self.sessions.save(id, state).await?;
        result
    }

    pub async fn history(&self, id: Uuid) -> Result<Vec<Turn>, DomainError> {
        Ok(self.state(id).await?.history().to_vec())
    }

    pub async fn end(&self, id: Uuid) -> Result<(), DomainError> {
        if self.sessions.delete(id).await? {
            info!("Ended session {}", id);
            Ok(())
        } else {
            Err(DomainError::not_found(format!("session {id}")))
        }
    }

    pub async fn active_sessions(&self) -> Result<usize, DomainError> {
        self.sessions.count().await
    }
}
