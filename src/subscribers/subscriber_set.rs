//! # Non-blocking event fan-out to multiple subscribers.
//!
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//! - **Isolation**: a slow or panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in publish order
//!
//! Workers wrap each `on_event` in `catch_unwind` with `AssertUnwindSafe`; a subscriber
//! that panics while holding a lock may leave its own state inconsistent.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind};
use crate::panic::panic_message;
use crate::subscribers::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
///
/// One bounded queue and one worker task per subscriber.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            channels.push(SubscriberChannel {
                name: sub.name(),
                sender: tx,
            });
            workers.push(tokio::spawn(drive_subscriber(sub, rx, bus.clone())));
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Number of subscribers in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits an event to all subscribers without waiting for them.
    ///
    /// Overflow events are not re-published when they themselves overflow.
    pub fn emit(&self, event: &Event) {
        let event = Arc::new(event.clone());
        let is_overflow = event.kind == EventKind::SubscriberOverflow;

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            tracing::warn!(subscriber = channel.name, reason, "dropping event for subscriber");
            if !is_overflow {
                self.bus.publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes every queue and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

async fn drive_subscriber(
    sub: Arc<dyn Subscribe>,
    mut rx: mpsc::Receiver<Arc<Event>>,
    bus: Bus,
) {
    while let Some(ev) = rx.recv().await {
        let delivery = AssertUnwindSafe(sub.on_event(ev.as_ref())).catch_unwind();
        if let Err(payload) = delivery.await {
            let info = panic_message(&*payload);
            tracing::error!(subscriber = sub.name(), panic = %info, "subscriber panicked");
            bus.publish(Event::subscriber_panicked(sub.name(), info));
        }
    }
}
