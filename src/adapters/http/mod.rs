//! HTTP adapter - JSON API over axum.
//!
//! - `/api/sessions` - chat sessions, one conversation each
//! - `/api/admin/regeneration` - catalogue regeneration trigger and status
//! - `/health` - liveness

pub mod admin;
pub mod chat;
mod error_response;

pub use admin::{admin_routes, AdminAppState};
pub use chat::{chat_routes, ChatApiError, ChatAppState};
pub use error_response::ErrorResponse;

use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Complete application router with tracing and a request timeout.
pub fn app_router(chat: ChatAppState, admin: AdminAppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/sessions", chat_routes(chat))
        .nest("/api/admin/regeneration", admin_routes(admin))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

async fn health() -> &'static str {
    "ok"
}
