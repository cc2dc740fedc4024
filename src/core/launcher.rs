//! # Launcher: starts background work on behalf of hook bodies.
//!
//! Two flavours:
//! - [`Launcher::spawn`]: fire-and-forget. The task runs on its own tokio task;
//!   nobody observes how it ends. Faults are the task's own business.
//! - [`Launcher::supervise`]: the task runs under a supervisor loop that relaunches
//!   it after every fault, forever (see [`supervisor`](super::supervisor)).
//!
//! Both return immediately, so the hook that called them (and the sequencer
//! awaiting that hook) is never held up by the work it launched.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::supervisor::{SupervisedHandle, Supervisor};
use crate::error::{LaunchError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::tasks::TaskRef;

/// Starts concurrent units of execution for hook bodies.
///
/// Cheap to clone; clones share the set of supervised task names.
#[derive(Clone, Debug)]
pub struct Launcher {
    bus: Bus,
    restart_delay: Duration,
    supervised: Arc<Mutex<HashSet<String>>>,
}

impl Launcher {
    pub(crate) fn new(bus: Bus, restart_delay: Duration) -> Self {
        Self {
            bus,
            restart_delay,
            supervised: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Launches `task` without supervision and returns its handle immediately.
    ///
    /// The handle may be dropped; the task keeps running. Its result, error or
    /// panic is never linked back to the launcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, task: TaskRef) -> JoinHandle<Result<(), TaskError>> {
        tracing::debug!(task = task.name(), "launching background task");
        self.bus
            .publish(Event::now(EventKind::TaskSpawned).with_task(task.name()));
        tokio::spawn(async move { task.spawn().await })
    }

    /// Launches `task` under a supervisor loop and returns immediately.
    ///
    /// A task name can be supervised only once per launcher; a second call fails
    /// with [`LaunchError::AlreadySupervised`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn supervise(&self, task: TaskRef) -> Result<SupervisedHandle, LaunchError> {
        let name = task.name().to_string();
        {
            let mut supervised = self
                .supervised
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !supervised.insert(name.clone()) {
                return Err(LaunchError::AlreadySupervised { name });
            }
        }

        tracing::info!(task = %name, restart_delay = ?self.restart_delay, "starting supervised task");
        Ok(Supervisor::new(task, self.bus.clone(), self.restart_delay).start())
    }

    /// Fixed delay applied between a supervised crash and the relaunch.
    pub fn restart_delay(&self) -> Duration {
        self.restart_delay
    }
}
