//! # Context handed to every hook.

use crate::core::launcher::Launcher;
use crate::core::supervisor::SupervisedHandle;
use crate::error::{LaunchError, TaskError};
use crate::events::Bus;
use crate::resources::Resources;
use crate::tasks::TaskRef;

use tokio::task::JoinHandle;

/// What a hook body can reach: the shared [`Resources`], the [`Launcher`] for
/// background work, and the event [`Bus`].
///
/// Cheap to clone; every hook of one run receives a clone of the same context.
#[derive(Clone, Debug)]
pub struct HookContext {
    launcher: Launcher,
    resources: Resources,
    bus: Bus,
}

impl HookContext {
    pub(crate) fn new(launcher: Launcher, resources: Resources, bus: Bus) -> Self {
        Self {
            launcher,
            resources,
            bus,
        }
    }

    /// Typed store written by earlier hooks and read by later ones.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Launcher for fire-and-forget and supervised background tasks.
    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Event bus shared with the sequencer.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Shorthand for [`Launcher::spawn`].
    pub fn spawn(&self, task: TaskRef) -> JoinHandle<Result<(), TaskError>> {
        self.launcher.spawn(task)
    }

    /// Shorthand for [`Launcher::supervise`].
    pub fn supervise(&self, task: TaskRef) -> Result<SupervisedHandle, LaunchError> {
        self.launcher.supervise(task)
    }
}
