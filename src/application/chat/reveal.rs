//! Reveal animator - paces a reply into its target message one character per
//! tick.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::chat::reveal_frames;
use crate::domain::foundation::{MessageId, ValidationError};

/// Default cadence of the reveal.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(15);

/// Shortest accepted cadence; tokio intervals cannot tick at zero.
pub const MIN_REVEAL_INTERVAL: Duration = Duration::from_millis(1);

/// Receives the successive prefixes of a revealed reply.
pub trait RevealTarget {
    /// Shows `content` as the current text of message `id`.
    fn show(&mut self, id: MessageId, content: &str) -> Result<(), ValidationError>;
}

/// How a reveal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The full text is shown.
    Completed { frames: usize },
    /// Aborted by a reset after `frames` prefixes.
    Cancelled { frames: usize },
}

impl RevealOutcome {
    pub fn frames(&self) -> usize {
        match self {
            RevealOutcome::Completed { frames } | RevealOutcome::Cancelled { frames } => *frames,
        }
    }
}

/// Reset signal observed by in-flight work.
///
/// Wraps the controller's reset epoch: work started under one epoch is
/// cancelled as soon as the epoch moves on.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    epoch_rx: watch::Receiver<u64>,
    epoch: u64,
}

impl CancelSignal {
    pub fn new(epoch_rx: watch::Receiver<u64>, epoch: u64) -> Self {
        Self { epoch_rx, epoch }
    }

    /// A signal that never fires.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(0);
        // Dropping the sender makes `changed()` fail, which `cancelled()`
        // treats as "never cancelled".
        drop(tx);
        Self::new(rx, 0)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.epoch_rx.borrow() != self.epoch
    }

    /// Resolves once a reset has been requested.
    pub async fn cancelled(&mut self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            if self.epoch_rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Reveals text at a fixed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealAnimator {
    interval: Duration,
}

impl Default for RevealAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

impl RevealAnimator {
    /// Creates an animator ticking every `interval`, raised to
    /// [`MIN_REVEAL_INTERVAL`] if shorter.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_REVEAL_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Grows message `id` through every prefix of `text`, one per tick.
    ///
    /// The first prefix is shown one interval after the call. A text of N
    /// characters completes after N frames; empty text completes at once.
    ///
    /// # Errors
    ///
    /// Propagates the target's error when the message can no longer be
    /// addressed.
    pub async fn reveal<T>(
        &self,
        target: &mut T,
        id: MessageId,
        text: &str,
        cancel: &mut CancelSignal,
    ) -> Result<RevealOutcome, ValidationError>
    where
        T: RevealTarget + ?Sized,
    {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut frames = 0;
        for prefix in reveal_frames(text) {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel.cancelled() => {
                    tracing::debug!(message_id = %id, frames, "Reveal cancelled");
                    return Ok(RevealOutcome::Cancelled { frames });
                }
            }
            target.show(id, prefix)?;
            frames += 1;
        }
        Ok(RevealOutcome::Completed { frames })
    }
}
