//! HTTP routes for the admin endpoints.

use axum::{routing::get, Router};

use super::handlers::{open_regeneration, regeneration_status, start_regeneration, AdminAppState};

/// Routes mounted under `/api/admin/regeneration`.
pub fn admin_routes(state: AdminAppState) -> Router {
    Router::new()
        .route("/", get(open_regeneration).post(start_regeneration))
        .route("/status", get(regeneration_status))
        .with_state(state)
}
