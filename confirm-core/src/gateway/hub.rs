//! Interaction hub: fan out button presses to waiting prompts

use crate::models::ComponentInteraction;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;

/// Events buffered per subscriber before it starts lagging
pub const DEFAULT_HUB_CAPACITY: usize = 256;

/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Result of waiting for a matching interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitResult {
    Matched(ComponentInteraction),
    TimedOut,
}

/// Broadcast point between an event source (e.g. the websocket gateway) and
/// every prompt currently waiting for an answer.
#[derive(Clone)]
pub struct InteractionHub {
    tx: broadcast::Sender<ComponentInteraction>,
}

impl InteractionHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: ComponentInteraction) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> InteractionSubscription {
        InteractionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InteractionHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

/// One subscriber's view of the interaction stream. Only events published
/// after `subscribe()` are seen.
pub struct InteractionSubscription {
    rx: broadcast::Receiver<ComponentInteraction>,
}

impl InteractionSubscription {
    /// Wait for the first event satisfying `predicate`, giving up after `timeout`.
    ///
    /// Non-matching events are discarded. A lagging subscriber skips what it
    /// missed and keeps waiting. A closed hub can never deliver a match, so the
    /// wait runs out the remaining time and reports `TimedOut`.
    pub async fn wait_for<F>(&mut self, mut predicate: F, timeout: Duration) -> WaitResult
    where
        F: FnMut(&ComponentInteraction) -> bool + Send,
    {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        loop {
            match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                Err(_) => return WaitResult::TimedOut,
                Ok(Ok(event)) => {
                    if predicate(&event) {
                        return WaitResult::Matched(event);
                    }
                }
                Ok(Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "Interaction subscriber lagged; events dropped");
                }
                Ok(Err(RecvError::Closed)) => {
                    tokio::time::sleep_until(deadline).await;
                    return WaitResult::TimedOut;
                }
            }
        }
    }
}
