//! Chat turn state machine.
//!
//! One turn moves through these states:
//! - `Idle`: no turn in flight, sends are accepted
//! - `Sent`: user message appended, request not issued yet
//! - `AwaitingReply`: request in flight, loading indicator on
//! - `Revealing`: reply appended, text being revealed
//! - `Failed`: request failed, error reply appended

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    Sent,
    AwaitingReply,
    Revealing,
    Failed,
}

impl TurnState {
    /// Returns true while a turn is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns true while the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::AwaitingReply)
    }
}

impl StateMachine for TurnState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TurnState::*;
        matches!(
            (self, target),
            (Idle, Sent) |
            (Sent, AwaitingReply) |
            (AwaitingReply, Revealing) |
            (AwaitingReply, Failed) |
            (Revealing, Idle) |
            (Failed, Idle) |
            // A reset abandons the turn from any in-flight state
            (Sent, Idle) |
            (AwaitingReply, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TurnState::*;
        match self {
            Idle => vec![Sent],
            Sent => vec![AwaitingReply, Idle],
            AwaitingReply => vec![Revealing, Failed, Idle],
            Revealing => vec![Idle],
            Failed => vec![Idle],
        }
    }
}
