//! Application layer - services coordinating domain logic and ports.
//!
//! - `connectivity` - one-shot backend reachability gate
//! - `aggregator` - concurrent all-or-nothing dataset load
//! - `chat` - per-session chat actor with paced reply reveal

pub mod aggregator;
pub mod chat;
pub mod connectivity;

pub use aggregator::{DatasetAggregator, DatasetKind, LoadError};
pub use chat::{
    BusyPolicy, ChatController, ChatControllerConfig, ChatError, ChatSnapshot, RevealAnimator,
    RevealOutcome, TurnOutcome,
};
pub use connectivity::{ConnectivityGate, ConnectivityStatus, ProbePolicy, REMEDIATION_HINT};
