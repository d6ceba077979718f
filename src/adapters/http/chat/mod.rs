//! Chat endpoints: one conversation per session.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::chat_routes;
