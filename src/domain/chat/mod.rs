//! Chat domain module.
//!
//! Messages, the transcript, the per-turn state machine and reveal framing.

mod message;
mod reveal;
mod session;
mod state;

pub use message::{error_reply, ChatMessage, ChatRole, NO_RESPONSE_NOTICE, SUGGESTED_QUESTIONS};
pub use reveal::{frame_count, reveal_frames};
pub use session::ChatSession;
pub use state::TurnState;
