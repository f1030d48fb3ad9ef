//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `backend` - statistics and assistant backend (HTTP, mock)

pub mod backend;

pub use backend::{HttpBackend, HttpBackendConfig, MockBackend, MockReply};
