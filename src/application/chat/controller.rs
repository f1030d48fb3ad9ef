//! Chat session controller.
//!
//! A per-session actor owns the transcript and runs one turn at a time:
//!
//! ```text
//! Idle ─▶ Sent ─▶ AwaitingReply ─┬─▶ Revealing ─▶ Idle
//!                                └─▶ Failed ────▶ Idle
//! ```
//!
//! Callers hold a cloneable [`ChatController`] handle. Every accepted send
//! appends exactly one user message and then exactly one assistant message;
//! turns never interleave. Sends issued while a turn is in flight follow the
//! configured [`BusyPolicy`].
//!
//! State for presentation is published as a [`ChatSnapshot`] through a
//! watch channel. [`ChatController::reset`] aborts the in-flight request or
//! reveal, drops queued turns and clears the transcript.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

use super::reveal::{
    CancelSignal, RevealAnimator, RevealOutcome, RevealTarget, DEFAULT_REVEAL_INTERVAL,
};
use crate::domain::chat::{
    error_reply, ChatMessage, ChatSession, TurnState, NO_RESPONSE_NOTICE, SUGGESTED_QUESTIONS,
};
use crate::domain::foundation::{MessageId, StateMachine, ValidationError};
use crate::ports::{ApiError, ChatAssistant};

/// What happens to a send issued while a turn is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Refuse with [`ChatError::Busy`]; the transcript is untouched.
    #[default]
    Reject,
    /// Queue the send (bounded) and run it after the current turn.
    Queue,
}

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatControllerConfig {
    pub reveal_interval: Duration,
    pub busy_policy: BusyPolicy,
    /// Sends that may wait behind the running turn under [`BusyPolicy::Queue`].
    pub queue_capacity: usize,
}

impl Default for ChatControllerConfig {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            busy_policy: BusyPolicy::Reject,
            queue_capacity: 8,
        }
    }
}

impl ChatControllerConfig {
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    pub fn with_busy_policy(mut self, policy: BusyPolicy) -> Self {
        self.busy_policy = policy;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

/// Why a send was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("a chat turn is already in flight")]
    Busy,

    #[error("chat queue is full ({capacity} pending turns)")]
    QueueFull { capacity: usize },

    #[error("chat controller has stopped")]
    Closed,
}

/// How an accepted send ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    /// The reply was fully revealed.
    Completed { reply: MessageId, frames: usize },
    /// The request failed; an error reply was appended.
    Failed { reply: MessageId, error: ApiError },
    /// A reset aborted the turn.
    Cancelled,
}

/// Chat state as presentation sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub messages: Vec<ChatMessage>,
    /// Pending input buffer.
    pub draft: String,
    /// True while a reply is awaited.
    pub loading: bool,
    pub state: TurnState,
}

impl ChatSnapshot {
    /// Canned prompts, offered only while the transcript is empty.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.is_empty() {
            &SUGGESTED_QUESTIONS
        } else {
            &[]
        }
    }
}

#[derive(Debug)]
enum Command {
    Turn {
        text: String,
        epoch: u64,
        permit: TurnPermit,
        reply: oneshot::Sender<TurnOutcome>,
    },
    Reset {
        done: oneshot::Sender<()>,
    },
}

/// State shared by the handles and the actor.
#[derive(Debug)]
struct Shared {
    snapshot: watch::Sender<ChatSnapshot>,
    reset_epoch: watch::Sender<u64>,
    /// Accepted turns not yet finished (running plus queued).
    in_flight: AtomicUsize,
    busy_policy: BusyPolicy,
    queue_capacity: usize,
}

impl Shared {
    fn admit(self: &Arc<Self>) -> Result<TurnPermit, ChatError> {
        let limit = match self.busy_policy {
            BusyPolicy::Reject => 1,
            BusyPolicy::Queue => 1 + self.queue_capacity,
        };
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .map(|_| TurnPermit {
                shared: Arc::clone(self),
            })
            .map_err(|_| match self.busy_policy {
                BusyPolicy::Reject => ChatError::Busy,
                BusyPolicy::Queue => ChatError::QueueFull {
                    capacity: self.queue_capacity,
                },
            })
    }

}

/// One admitted turn. Dropping it frees the slot, including when the turn
/// is discarded with a stopped actor.
#[derive(Debug)]
struct TurnPermit {
    shared: Arc<Shared>,
}

impl Drop for TurnPermit {
    fn drop(&mut self) {
        self.shared.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle to a chat session actor.
#[derive(Debug, Clone)]
pub struct ChatController {
    shared: Arc<Shared>,
    commands: mpsc::Sender<Command>,
}

impl ChatController {
    /// Spawns the session actor on the current tokio runtime.
    pub fn spawn(assistant: Arc<dyn ChatAssistant>, config: ChatControllerConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(config.queue_capacity.max(1) + 1);
        let (snapshot, _) = watch::channel(ChatSnapshot::default());
        let (reset_epoch, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            snapshot,
            reset_epoch,
            in_flight: AtomicUsize::new(0),
            busy_policy: config.busy_policy,
            queue_capacity: config.queue_capacity,
        });

        let actor = ChatActor {
            assistant,
            session: ChatSession::new(),
            state: TurnState::Idle,
            loading: false,
            animator: RevealAnimator::new(config.reveal_interval),
            shared: Arc::clone(&shared),
            commands: commands_rx,
        };
        tokio::spawn(actor.run());

        Self {
            shared,
            commands: commands_tx,
        }
    }

    /// Sends one chat turn and waits until its reply is fully revealed.
    ///
    /// Blank text is a no-op returning [`TurnOutcome::Ignored`]. An accepted
    /// turn clears the pending input buffer.
    ///
    /// # Errors
    ///
    /// - [`ChatError::Busy`] / [`ChatError::QueueFull`] per the busy policy
    /// - [`ChatError::Closed`] if the actor has stopped
    pub async fn send_turn(&self, text: &str) -> Result<TurnOutcome, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        let permit = self.shared.admit()?;
        self.shared.snapshot.send_modify(|s| s.draft.clear());
        self.submit(text.to_string(), permit).await
    }

    /// Sends the pending input buffer.
    pub async fn send_draft(&self) -> Result<TurnOutcome, ChatError> {
        let draft = self.shared.snapshot.borrow().draft.clone();
        self.send_turn(&draft).await
    }

    /// Replaces the pending input buffer.
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.snapshot.send_modify(|s| s.draft = text);
    }

    /// Aborts any in-flight turn, drops queued turns and clears the session.
    pub async fn reset(&self) -> Result<(), ChatError> {
        self.shared.reset_epoch.send_modify(|epoch| *epoch += 1);
        let (done_tx, done_rx) = oneshot::channel();
        self.commands
            .send(Command::Reset { done: done_tx })
            .await
            .map_err(|_| ChatError::Closed)?;
        done_rx.await.map_err(|_| ChatError::Closed)
    }

    /// Current chat state.
    pub fn snapshot(&self) -> ChatSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Subscribes to chat state changes, including every reveal frame.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn suggested_questions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    /// Accepted turns not yet finished.
    pub fn pending_turns(&self) -> usize {
        self.shared.in_flight.load(Ordering::SeqCst)
    }

    async fn submit(&self, text: String, permit: TurnPermit) -> Result<TurnOutcome, ChatError> {
        let epoch = *self.shared.reset_epoch.borrow();
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command::Turn {
            text,
            epoch,
            permit,
            reply: reply_tx,
        };
        self.commands
            .send(command)
            .await
            .map_err(|_| ChatError::Closed)?;
        reply_rx.await.map_err(|_| ChatError::Closed)
    }
}

/// Owns the transcript and runs turns sequentially.
struct ChatActor {
    assistant: Arc<dyn ChatAssistant>,
    session: ChatSession,
    state: TurnState,
    loading: bool,
    animator: RevealAnimator,
    shared: Arc<Shared>,
    commands: mpsc::Receiver<Command>,
}

impl ChatActor {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Turn {
                    text,
                    epoch,
                    permit,
                    reply,
                } => {
                    let outcome = self.run_turn(text, epoch).await;
                    drop(permit);
                    // The caller may have stopped waiting.
                    let _ = reply.send(outcome);
                }
                Command::Reset { done } => {
                    self.clear();
                    let _ = done.send(());
                }
            }
        }
        tracing::debug!("Chat controller stopped");
    }

    async fn run_turn(&mut self, text: String, epoch: u64) -> TurnOutcome {
        let mut cancel = CancelSignal::new(self.shared.reset_epoch.subscribe(), epoch);
        if cancel.is_cancelled() {
            tracing::debug!("Dropping turn queued before reset");
            return TurnOutcome::Cancelled;
        }

        self.session.append_user(text.as_str());
        self.transition(TurnState::Sent);
        self.publish();

        self.loading = true;
        self.transition(TurnState::AwaitingReply);
        self.publish();

        let assistant = Arc::clone(&self.assistant);
        let result = tokio::select! {
            result = assistant.ask(&text) => result,
            _ = cancel.cancelled() => return self.abandon(),
        };
        self.loading = false;

        match result {
            Ok(reply) => self.reveal_reply(reply, &mut cancel).await,
            Err(error) => self.fail(error),
        }
    }

    async fn reveal_reply(&mut self, reply: String, cancel: &mut CancelSignal) -> TurnOutcome {
        let text = if reply.is_empty() {
            NO_RESPONSE_NOTICE.to_string()
        } else {
            reply
        };
        let id = self.session.append_assistant(String::new());
        self.transition(TurnState::Revealing);
        self.publish();

        let animator = self.animator;
        match animator.reveal(self, id, &text, cancel).await {
            Ok(RevealOutcome::Completed { frames }) => {
                self.transition(TurnState::Idle);
                self.publish();
                TurnOutcome::Completed { reply: id, frames }
            }
            Ok(RevealOutcome::Cancelled { .. }) => self.abandon(),
            Err(err) => {
                tracing::error!(error = %err, "Reveal target vanished");
                self.abandon()
            }
        }
    }

    fn fail(&mut self, error: ApiError) -> TurnOutcome {
        tracing::warn!(error = %error, "Chat request failed");
        let id = self.session.append_assistant(error_reply(&error));
        self.transition(TurnState::Failed);
        self.publish();
        self.transition(TurnState::Idle);
        self.publish();
        TurnOutcome::Failed { reply: id, error }
    }

    fn abandon(&mut self) -> TurnOutcome {
        tracing::debug!(state = ?self.state, "Chat turn cancelled");
        self.loading = false;
        self.transition(TurnState::Idle);
        self.publish();
        TurnOutcome::Cancelled
    }

    fn clear(&mut self) {
        self.session.clear();
        self.loading = false;
        self.state = TurnState::Idle;
        self.shared.snapshot.send_modify(|s| s.draft.clear());
        self.publish();
        tracing::info!("Chat session reset");
    }

    fn transition(&mut self, next: TurnState) {
        match self.state.transition_to(next) {
            Ok(state) => {
                tracing::debug!(from = ?self.state, to = ?state, "Chat turn transition");
                self.state = state;
            }
            Err(err) => tracing::error!(error = %err, "Rejected chat turn transition"),
        }
    }

    fn publish(&self) {
        let messages = self.session.messages().to_vec();
        let loading = self.loading;
        let state = self.state;
        self.shared.snapshot.send_modify(move |s| {
            s.messages = messages;
            s.loading = loading;
            s.state = state;
        });
    }
}

impl RevealTarget for ChatActor {
    fn show(&mut self, id: MessageId, content: &str) -> Result<(), ValidationError> {
        self.session.set_reply_content(id, content)?;
        self.publish();
        Ok(())
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
