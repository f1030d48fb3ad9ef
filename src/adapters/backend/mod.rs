//! Statistics backend adapters.
//!
//! - `HttpBackend` - reqwest client for the JSON API
//! - `MockBackend` - in-memory implementation for tests

mod http_backend;
mod mock_backend;

pub use http_backend::{endpoints, HttpBackend, HttpBackendConfig};
pub use mock_backend::{MockBackend, MockCalls, MockReply, DEFAULT_MOCK_REPLY};
