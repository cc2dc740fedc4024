//! # Runtime events emitted by the sequencer, launcher and supervisor loops.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Sequence events**: hook execution flow (starting, finished, failed, completed)
//! - **Task events**: launches and supervised task lifecycle (spawned, starting, failed, stopped, restart)
//! - **Subscriber events**: delivery problems in the subscriber fan-out (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, hook/task name,
//! priority, attempt number, error kind and restart delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use bootvisor::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::RestartScheduled)
//!     .with_task("blockfeed")
//!     .with_attempt(3)
//!     .with_delay(Duration::from_secs(2));
//!
//! assert_eq!(ev.kind, EventKind::RestartScheduled);
//! assert_eq!(ev.task.as_deref(), Some("blockfeed"));
//! assert_eq!(ev.delay_ms, Some(2000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `error`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `error`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Sequence events ===
    /// A hook is about to run.
    ///
    /// Sets:
    /// - `task`: hook name
    /// - `priority`: hook priority
    HookStarting,

    /// A hook returned successfully.
    ///
    /// Sets:
    /// - `task`: hook name
    /// - `priority`: hook priority
    HookFinished,

    /// A hook returned an error; the sequence is aborted.
    ///
    /// Sets:
    /// - `task`: hook name
    /// - `priority`: hook priority
    /// - `error`: hook error message
    HookFailed,

    /// Every registered hook returned successfully.
    ///
    /// Sets:
    /// - `attempt`: number of hooks run
    SequenceCompleted,

    // === Task events ===
    /// A fire-and-forget task was launched.
    ///
    /// Sets:
    /// - `task`: task name
    TaskSpawned,

    /// A supervised task is starting an attempt.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: attempt number (1-based)
    TaskStarting,

    /// A supervised task attempt ended with a fault (error or panic).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: attempt number
    /// - `error_kind`: error label (`task_failed`, `task_panicked`)
    /// - `error`: error message
    TaskFailed,

    /// A supervised task returned cleanly; it will not be restarted.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: attempt number
    TaskStopped,

    /// The next attempt of a supervised task is scheduled after a fixed delay.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: failed attempt number
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `error`: last failure message
    RestartScheduled,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the hook, task or subscriber, if applicable.
    pub task: Option<Arc<str>>,
    /// Hook priority.
    pub priority: Option<i32>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Restart delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Stable error label.
    pub error_kind: Option<&'static str>,
    /// Human-readable error or reason.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            priority: None,
            attempt: None,
            delay_ms: None,
            error_kind: None,
            error: None,
        }
    }

    /// Attaches a hook/task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a hook priority.
    #[inline]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a stable error label.
    #[inline]
    pub fn with_error_kind(mut self, kind: &'static str) -> Self {
        self.error_kind = Some(kind);
        self
    }

    /// Attaches a human-readable error.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_error(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_error(info)
    }
}
