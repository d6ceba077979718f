//! HTTP handlers for catalogue regeneration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::{RegenerationStatus, RegenerationTask};

#[derive(Clone)]
pub struct AdminAppState {
    pub regeneration: RegenerationTask,
}

impl AdminAppState {
    pub fn new(regeneration: RegenerationTask) -> Self {
        Self { regeneration }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/admin/regeneration - Admin page visit; clears a finished run
pub async fn open_regeneration(State(state): State<AdminAppState>) -> Json<RegenerationStatus> {
    Json(state.regeneration.reset())
}

/// POST /api/admin/regeneration - Start regeneration in the background
///
/// Accepted whether or not a run was started; a run already in progress
/// or not yet reset is left alone.
pub async fn start_regeneration(State(state): State<AdminAppState>) -> impl IntoResponse {
    if !state.regeneration.start_if_idle() {
        info!(status = state.regeneration.status().status, "Regeneration not started");
    }
    (
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "Generation started".to_string(),
        }),
    )
}

/// GET /api/admin/regeneration/status - Poll progress
pub async fn regeneration_status(State(state): State<AdminAppState>) -> Json<RegenerationStatus> {
    Json(state.regeneration.status())
}
