//! Web front-end: an HTML form for humans and a small JSON API.

mod handlers;
mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::application::ChatSessionUseCase;

pub use handlers::create_router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatSessionUseCase>,
}

impl AppState {
    pub fn new(chat: ChatSessionUseCase) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}

/// Serve until Ctrl-C.
pub async fn serve(chat: ChatSessionUseCase, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("JokeBot listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(AppState::new(chat)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("JokeBot server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
