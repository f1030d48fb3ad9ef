//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait and validation errors
//! used by the statistics and chat domains.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::MessageId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
