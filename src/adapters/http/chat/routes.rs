//! HTTP routes for the chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_session, get_session, restart_session, send_message, ChatAppState};

/// Routes mounted under `/api/sessions`.
pub fn chat_routes(state: ChatAppState) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/messages", post(send_message))
        .route("/:id/restart", post(restart_session))
        .with_state(state)
}
