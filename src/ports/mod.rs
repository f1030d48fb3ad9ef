//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the backend service. Adapters implement these ports.
//!
//! - `HealthCheck` - backend reachability probe
//! - `StatisticsSource` - the four dashboard record collections
//! - `ChatAssistant` - conversational assistant over the statistics

mod api_error;
mod chat_assistant;
mod health_check;
mod statistics_source;

pub use api_error::ApiError;
pub use chat_assistant::ChatAssistant;
pub use health_check::HealthCheck;
pub use statistics_source::StatisticsSource;
