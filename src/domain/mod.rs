//! Domain layer: pure types and rules of the laptop advisor.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `profile` - Requirement levels, candidate and confirmed profiles
//! - `catalogue` - Catalogue items, feature profiles and the scorer
//! - `conversation` - Phases, transcripts, declared functions and session context

pub mod catalogue;
pub mod conversation;
pub mod foundation;
pub mod profile;
