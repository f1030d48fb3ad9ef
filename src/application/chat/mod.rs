//! Chat session controller and reply reveal.

mod controller;
mod reveal;

pub use controller::{
    BusyPolicy, ChatController, ChatControllerConfig, ChatError, ChatSnapshot, TurnOutcome,
};
pub use reveal::{
    CancelSignal, RevealAnimator, RevealOutcome, RevealTarget, DEFAULT_REVEAL_INTERVAL,
    MIN_REVEAL_INTERVAL,
};
