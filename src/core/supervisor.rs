//! # Supervisor: keeps one critical task alive for the life of the process.
//!
//! Each supervised task gets a dedicated loop running on its own tokio task. The
//! loop launches one execution at a time and waits on its `JoinHandle`; the join
//! result is the failure link back to the loop.
//!
//! ## Architecture
//! ```text
//! Launcher::supervise(task) ──► Supervisor::start() ──► returns SupervisedHandle
//!                                       │
//!                                       ▼ (tokio::spawn)
//! loop {
//!   ├─► attempt += 1, state = Running
//!   ├─► publish TaskStarting
//!   ├─► tokio::spawn(async { task.spawn().await }).await   (one execution)
//!   │       │
//!   │       ├─ Ok(())           ─► publish TaskStopped, state = Stopped, exit
//!   │       ├─ Err(TaskError)   ─┐
//!   │       └─ panic            ─┴► FailureSignal
//!   │                                 ├─► log, publish TaskFailed, state = Failed
//!   │                                 ├─► publish RestartScheduled, state = Restarting
//!   │                                 └─► sleep(restart_delay), continue
//!   └─ runtime shutdown (join cancelled) ─► exit
//! }
//! ```
//!
//! ## Rules
//! - Executions run **sequentially**: the next one starts only after the previous joined
//! - Every fault is followed by **exactly one** fixed-length delay and one relaunch
//! - There is no attempt ceiling and no growth of the delay
//! - A clean exit is **not** restarted

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::panic::panic_message;
use crate::tasks::TaskRef;

/// Notification built by a supervisor loop when its task faults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureSignal {
    /// Name of the failed task.
    pub task: Arc<str>,
    /// Attempt that failed (1-based).
    pub attempt: u32,
    /// The fault.
    pub error: TaskError,
}

impl FailureSignal {
    /// Stable label of the error kind.
    pub fn kind(&self) -> &'static str {
        self.error.as_label()
    }

    /// Error message without the kind.
    pub fn message(&self) -> String {
        self.error.as_message()
    }
}

impl fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed with {}: {}", self.task, self.kind(), self.message())
    }
}

/// Observable state of a supervised task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SupervisedState {
    /// The loop has not launched the task yet.
    NotStarted,
    /// An execution is in progress.
    Running {
        /// Current attempt (1-based).
        attempt: u32,
    },
    /// The last execution faulted; a restart follows.
    Failed {
        /// The fault that was observed.
        signal: FailureSignal,
    },
    /// Waiting out the fixed delay before the next attempt.
    Restarting {
        /// Attempt that failed.
        attempt: u32,
        /// Delay before the next attempt.
        delay: Duration,
    },
    /// The task returned cleanly; the loop has ended.
    Stopped {
        /// Attempt that returned.
        attempt: u32,
    },
}

/// Handle to a supervised task returned by [`Launcher::supervise`](crate::Launcher::supervise).
///
/// Dropping it does not affect the supervisor loop.
#[derive(Debug)]
pub struct SupervisedHandle {
    name: Arc<str>,
    state: watch::Receiver<SupervisedState>,
    launches: Arc<AtomicU32>,
    join: JoinHandle<()>,
}

impl SupervisedHandle {
    /// Name of the supervised task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state snapshot.
    pub fn state(&self) -> SupervisedState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<SupervisedState> {
        self.state.clone()
    }

    /// Number of executions launched so far.
    pub fn launches(&self) -> u32 {
        self.launches.load(Ordering::Acquire)
    }

    /// Returns `true` once the supervisor loop has ended.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits until the task exits cleanly and returns the attempt that did.
    ///
    /// Returns `None` if the loop ended without a clean exit (runtime shutdown).
    pub async fn stopped(&self) -> Option<u32> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| matches!(s, SupervisedState::Stopped { .. }))
            .await
            .ok()?;
        match *state {
            SupervisedState::Stopped { attempt } => Some(attempt),
            _ => None,
        }
    }
}

/// Restart loop for one task.
pub(crate) struct Supervisor {
    task: TaskRef,
    bus: Bus,
    restart_delay: Duration,
    state: watch::Sender<SupervisedState>,
    launches: Arc<AtomicU32>,
}

impl Supervisor {
    pub(crate) fn new(task: TaskRef, bus: Bus, restart_delay: Duration) -> Self {
        let (state, _) = watch::channel(SupervisedState::NotStarted);
        Self {
            task,
            bus,
            restart_delay,
            state,
            launches: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Moves the loop onto its own tokio task.
    pub(crate) fn start(self) -> SupervisedHandle {
        let name: Arc<str> = Arc::from(self.task.name());
        let state = self.state.subscribe();
        let launches = Arc::clone(&self.launches);
        let join = tokio::spawn(self.run());

        SupervisedHandle {
            name,
            state,
            launches,
            join,
        }
    }

    async fn run(self) {
        let name: Arc<str> = Arc::from(self.task.name());
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            self.launches.fetch_add(1, Ordering::AcqRel);
            self.state.send_replace(SupervisedState::Running { attempt });
            self.bus.publish(
                Event::now(EventKind::TaskStarting)
                    .with_task(Arc::clone(&name))
                    .with_attempt(attempt),
            );

            // The future is built inside the child so a panicking factory is joined as a panic.
            let task = Arc::clone(&self.task);
            let outcome = match tokio::spawn(async move { task.spawn().await }).await {
                Ok(res) => res,
                Err(err) if err.is_panic() => Err(TaskError::Panicked {
                    info: panic_message(&*err.into_panic()),
                }),
                Err(_) => {
                    tracing::debug!(task = %name, attempt, "supervised task cancelled by runtime shutdown");
                    return;
                }
            };

            let error = match outcome {
                Ok(()) => {
                    tracing::info!(task = %name, attempt, "supervised task exited cleanly; not restarting");
                    self.bus.publish(
                        Event::now(EventKind::TaskStopped)
                            .with_task(Arc::clone(&name))
                            .with_attempt(attempt),
                    );
                    self.state.send_replace(SupervisedState::Stopped { attempt });
                    return;
                }
                Err(error) => error,
            };

            let signal = FailureSignal {
                task: Arc::clone(&name),
                attempt,
                error,
            };
            self.report_failure(&signal);
            let last_error = signal.message();
            self.state.send_replace(SupervisedState::Failed { signal });

            let delay = self.restart_delay;
            tracing::warn!(task = %name, attempt, delay = ?delay, "restarting supervised task");
            self.bus.publish(
                Event::now(EventKind::RestartScheduled)
                    .with_task(Arc::clone(&name))
                    .with_attempt(attempt)
                    .with_delay(delay)
                    .with_error(last_error),
            );
            self.state
                .send_replace(SupervisedState::Restarting { attempt, delay });

            time::sleep(delay).await;
        }
    }

    fn report_failure(&self, signal: &FailureSignal) {
        tracing::error!(
            task = %signal.task,
            attempt = signal.attempt,
            kind = signal.kind(),
            error = %signal.message(),
            "{signal}"
        );
        self.bus.publish(
            Event::now(EventKind::TaskFailed)
                .with_task(Arc::clone(&signal.task))
                .with_attempt(signal.attempt)
                .with_error_kind(signal.kind())
                .with_error(signal.message()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;

    use tokio::sync::broadcast;
    use tokio::time::Instant;

    /// Task that fails `crashes` times, then either returns or runs forever.
    fn flaky(crashes: u32, then_exit: bool) -> (TaskRef, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let task = TaskFn::arc("blockfeed", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= crashes {
                    return Err(TaskError::fail(format!("crash #{n}")));
                }
                if !then_exit {
                    std::future::pending::<()>().await;
                }
                Ok(())
            }
        });
        (task, calls)
    }

    async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
        rx.recv().await.expect("bus closed")
    }

    #[tokio::test(start_paused = true)]
    async fn three_crashes_then_runs_indefinitely() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let delay = Duration::from_secs(2);
        let (task, calls) = flaky(3, false);

        let started = Instant::now();
        let handle = Supervisor::new(task, bus, delay).start();

        let mut failures = Vec::new();
        let mut restarts = Vec::new();
        loop {
            let ev = next_event(&mut rx).await;
            match ev.kind {
                EventKind::TaskFailed => failures.push(ev),
                EventKind::RestartScheduled => restarts.push(ev),
                EventKind::TaskStarting if ev.attempt == Some(4) => break,
                _ => {}
            }
        }

        assert_eq!(failures.len(), 3);
        assert_eq!(restarts.len(), 3);
        assert!(restarts.iter().all(|ev| ev.delay_ms == Some(2000)));
        assert_eq!(restarts[1].error.as_deref(), Some("crash #2"));
        assert_eq!(failures[0].error.as_deref(), Some("crash #1"));
        assert_eq!(failures[2].error_kind, Some("task_failed"));
        let elapsed = started.elapsed();
        assert!(elapsed >= delay * 3 && elapsed < delay * 4, "elapsed {elapsed:?}");

        tokio::task::yield_now().await;
        assert_eq!(handle.launches(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(handle.state(), SupervisedState::Running { attempt: 4 });
        assert!(!handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn n_crashes_give_n_plus_one_launches() {
        let bus = Bus::new(256);
        let mut rx = bus.subscribe();
        let (task, _) = flaky(10, true);

        let handle = Supervisor::new(task, bus, Duration::from_millis(500)).start();
        assert_eq!(handle.stopped().await, Some(11));
        assert_eq!(handle.launches(), 11);

        let mut failed = 0;
        let mut restarts = 0;
        let mut stopped = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::TaskFailed => failed += 1,
                EventKind::RestartScheduled => restarts += 1,
                EventKind::TaskStopped => stopped += 1,
                _ => {}
            }
        }
        assert_eq!((failed, restarts, stopped), (10, 10, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn clean_exit_is_not_restarted() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let (task, calls) = flaky(0, true);

        let handle = Supervisor::new(task, bus, Duration::from_secs(2)).start();
        assert_eq!(handle.stopped().await, Some(1));

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds, vec![EventKind::TaskStarting, EventKind::TaskStopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn panic_is_treated_as_failure() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let task = TaskFn::arc("panicky", move || {
            let first = counter.fetch_add(1, Ordering::SeqCst) == 0;
            async move {
                if first {
                    panic!("feed connection lost");
                }
                Ok::<(), TaskError>(())
            }
        });

        let handle = Supervisor::new(task, bus, Duration::from_secs(2)).start();
        assert_eq!(handle.stopped().await, Some(2));

        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|ev| ev.kind == EventKind::TaskFailed)
            .expect("failure event");
        assert_eq!(failed.error_kind, Some("task_panicked"));
        assert_eq!(failed.error.as_deref(), Some("feed connection lost"));
    }

    #[tokio::test(start_paused = true)]
    async fn panic_while_building_future_is_restarted() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let task = TaskFn::arc("blockfeed", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("zmq context unavailable");
            }
            async { Ok::<(), TaskError>(()) }
        });

        let handle = Supervisor::new(task, bus, Duration::from_secs(2)).start();
        assert_eq!(handle.stopped().await, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|ev| ev.kind == EventKind::TaskFailed)
            .expect("failure event");
        assert_eq!(failed.attempt, Some(1));
        assert_eq!(failed.error_kind, Some("task_panicked"));
        assert_eq!(failed.error.as_deref(), Some("zmq context unavailable"));
    }

    #[test]
    fn failure_signal_display() {
        let signal = FailureSignal {
            task: Arc::from("blockfeed"),
            attempt: 2,
            error: TaskError::fail("zmq socket closed"),
        };
        assert_eq!(signal.to_string(), "blockfeed failed with task_failed: zmq socket closed");
    }
}
