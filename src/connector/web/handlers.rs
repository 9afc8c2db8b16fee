use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use super::page::{self, Notice};
use super::AppState;
use crate::application::ChatSessionUseCase;
use crate::connector::api::controller::chat_controller::ERROR_REPLY;
use crate::domain::{ConversationState, DomainError, Reply};

/// Create the web router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Form page
        .route("/", get(index).post(submit))
        // JSON API
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/sessions/{id}/messages", post(send_message))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Form page
// ============================================================

#[derive(Debug, Deserialize)]
struct PageQuery {
    session: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    session: Option<Uuid>,
    message: String,
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    // A bare page load only renders the form; the session starts on first submit.
    let Some(id) = existing_session(&state.chat, query.session).await? else {
        return Ok(Html(page::render(None, &[], None)));
    };
    let history = state.chat.history(id).await?;
    Ok(Html(page::render(Some(id), &history, None)))
}

async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, ApiError> {
    if form.message.trim().is_empty() {
        let id = existing_session(&state.chat, form.session).await?;
        let history = match id {
            Some(id) => state.chat.history(id).await?,
            None => Vec::new(),
        };
        return Ok(Html(page::render(id, &history, None)));
    }

    let id = match existing_session(&state.chat, form.session).await? {
        Some(id) => id,
        None => state.chat.start().await?,
    };

    let reply = match state.chat.send(id, &form.message).await {
        Ok(reply) => reply,
        Err(e) if e.is_not_found() => return Err(e.into()),
        Err(e) => {
            warn!("Session {} request failed: {}", id, e);
            let history = state.chat.history(id).await?;
            return Ok(Html(page::render(
                Some(id),
                &history,
                Some(Notice::Error(ERROR_REPLY)),
            )));
        }
    };

    let history = state.chat.history(id).await?;
    let notice = reply.as_ref().map(|r| Notice::Reply(r.text()));
    Ok(Html(page::render(Some(id), &history, notice)))
}

/// The submitted session id, if that session is still alive.
async fn existing_session(
    chat: &ChatSessionUseCase,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, DomainError> {
    let Some(id) = requested else {
        return Ok(None);
    };
    match chat.state(id).await {
        Ok(_) => Ok(Some(id)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================
// JSON API
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub state: ConversationState,
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub reply: Option<Reply>,
    pub state: ConversationState,
}

async fn create_session(State(state): State<AppState>) -> Result<Response, ApiError> {
    let id = state.chat.start().await?;
    let view = SessionView {
        id,
        state: state.chat.state(id).await?,
    };
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(SessionView {
        id,
        state: state.chat.state(id).await?,
    }))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let reply = state.chat.send(id, &request.text).await?;
    Ok(Json(MessageResponse {
        reply,
        state: state.chat.state(id).await?,
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.chat.end(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health() -> &'static str {
    "ok"
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            DomainError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
