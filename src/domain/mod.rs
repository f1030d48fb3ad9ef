//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, state machine trait, errors)
//! - `statistics` - Port reference data, numeric normalization, raw records and views
//! - `chat` - Chat transcript, turn state machine and reveal framing

pub mod chat;
pub mod foundation;
pub mod statistics;
