//! Laptop Advisor - conversational laptop recommendations.
//!
//! A language model interviews the user until it can hand back a
//! requirement profile, a second model call confirms the profile, and a
//! deterministic scorer ranks the catalogue against it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
