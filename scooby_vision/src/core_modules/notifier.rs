// THEORY:
// Direction changes leave the tracker through a `NotificationSink`. The sink is
// fire-and-forget: `notify` must return immediately and may lose the event, and
// the tracker never learns whether delivery worked. Frame processing never waits
// on a consumer.
//
// Two sinks cover the common cases: any `Fn(&DirectionEvent)` closure, and a
// bounded tokio channel that drops events when the consumer falls behind.

use crate::core_modules::direction::DirectionLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// A direction change worth telling someone about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionEvent {
    pub label: DirectionLabel,
    /// Index of the frame that produced the event, counted from session start.
    pub frame_index: u64,
}

impl DirectionEvent {
    /// Human-readable payload, e.g. "Left".
    pub fn message(&self) -> &'static str {
        self.label.as_str()
    }
}

impl fmt::Display for DirectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub trait NotificationSink: Send {
    fn notify(&self, event: &DirectionEvent);
}

impl<F> NotificationSink for F
where
    F: Fn(&DirectionEvent) + Send,
{
    fn notify(&self, event: &DirectionEvent) {
        self(event)
    }
}

/// Bounded channel sink. Full or closed channels drop the event.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<DirectionEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<DirectionEvent>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DirectionEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, event: &DirectionEvent) {
        match self.tx.try_send(*event) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(label = %dropped.label, "Notification channel full, dropping event");
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::debug!(
                    label = %dropped.label,
                    "Notification channel closed, dropping event"
                );
            }
        }
    }
}
