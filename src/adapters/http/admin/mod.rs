//! Admin endpoints: catalogue regeneration.

mod handlers;
mod routes;

pub use handlers::{AdminAppState, MessageResponse};
pub use routes::admin_routes;
