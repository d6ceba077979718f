//! Use-case handlers.

pub mod dialogue;
pub mod regeneration;
