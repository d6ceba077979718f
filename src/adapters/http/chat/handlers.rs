//! HTTP handlers for the chat endpoints.
//!
//! The web layer owns the mapping from session id to conversation
//! context. A turn that fails hard leaves the context unusable, so the
//! session is dropped and the client is told to start a new one.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::application::{DialogueOrchestrator, TurnError};
use crate::domain::foundation::{ErrorCode, SessionId};
use crate::ports::{SessionStore, SharedContext};

use super::dto::{SendMessageRequest, SessionResponse, TurnResponse, WelcomeResponse};
use crate::adapters::http::error_response::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatAppState {
    pub orchestrator: Arc<DialogueOrchestrator>,
    pub sessions: Arc<dyn SessionStore>,
}

impl ChatAppState {
    pub fn new(orchestrator: Arc<DialogueOrchestrator>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            orchestrator,
            sessions,
        }
    }

    async fn session(&self, raw_id: &str) -> Result<(SessionId, SharedContext), ChatApiError> {
        let id: SessionId = raw_id
            .parse()
            .map_err(|_| ChatApiError::InvalidSessionId(raw_id.to_string()))?;
        let ctx = self
            .sessions
            .get(&id)
            .await
            .ok_or(ChatApiError::SessionNotFound(id))?;
        Ok((id, ctx))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Open a conversation
pub async fn create_session(
    State(state): State<ChatAppState>,
) -> Result<impl IntoResponse, ChatApiError> {
    let ctx = state
        .orchestrator
        .start(SessionId::new())
        .await
        .map_err(ChatApiError::StartFailed)?;

    let response = WelcomeResponse {
        session_id: ctx.session_id().to_string(),
        welcome: ctx.chat_log().last_bot_message().unwrap_or_default().to_string(),
        chat_log: ctx.chat_log().clone(),
    };
    state.sessions.insert(ctx).await;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/:id - Current phase and chat log
pub async fn get_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let (_, ctx) = state.session(&session_id).await?;
    let ctx = ctx.lock().await;
    Ok(Json(SessionResponse::from(&*ctx)))
}

/// POST /api/sessions/:id/messages - Handle one user message
pub async fn send_message(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ChatApiError::EmptyMessage);
    }
    let (id, shared) = state.session(&session_id).await?;

    let mut ctx = shared.lock().await;
    match state.orchestrator.handle_message(&mut ctx, message).await {
        Ok(outcome) => Ok(Json(TurnResponse::new(&ctx, outcome))),
        Err(err) => {
            drop(ctx);
            state.sessions.remove(&id).await;
            error!(session_id = %id, error = %err, "Turn failed, session discarded");
            Err(ChatApiError::RestartRequired(err))
        }
    }
}

/// POST /api/sessions/:id/restart - Start the conversation over
pub async fn restart_session(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let (id, shared) = state.session(&session_id).await?;

    let mut ctx = shared.lock().await;
    match state.orchestrator.restart(&mut ctx).await {
        Ok(welcome) => {
            info!(session_id = %id, "Session restarted on request");
            Ok(Json(WelcomeResponse {
                session_id: id.to_string(),
                welcome,
                chat_log: ctx.chat_log().clone(),
            }))
        }
        Err(err) => {
            drop(ctx);
            state.sessions.remove(&id).await;
            error!(session_id = %id, error = %err, "Restart failed, session discarded");
            Err(ChatApiError::RestartRequired(err))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum ChatApiError {
    InvalidSessionId(String),
    SessionNotFound(SessionId),
    EmptyMessage,
    /// The conversation could not be opened.
    StartFailed(TurnError),
    /// The turn failed and the session was discarded.
    RestartRequired(TurnError),
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ChatApiError::InvalidSessionId(raw) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(format!("Invalid session ID: {}", raw)),
            ),
            ChatApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id)),
            ),
            ChatApiError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request("Message cannot be empty"),
            ),
            ChatApiError::StartFailed(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(err.code(), err.to_string()),
            ),
            ChatApiError::RestartRequired(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(
                    ErrorCode::RestartRequired,
                    format!("{}. Please start a new conversation.", err),
                ),
            ),
        };
        (status, Json(body)).into_response()
    }
}
