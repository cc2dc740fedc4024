//! # Background task abstraction.
//!
//! A [`Task`] is a named factory of `'static` futures. Each call to
//! [`Task::spawn`] produces a fresh future for one execution, which is what
//! lets the supervisor start the same task again after a crash.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Long-running or periodic unit of background work.
///
/// Tasks are not cancellable: once launched, an execution runs until it returns
/// or panics.
///
/// # Example
/// ```
/// use bootvisor::{BoxTaskFuture, Task, TaskError};
///
/// struct Poller;
///
/// impl Task for Poller {
///     fn name(&self) -> &str { "poller" }
///
///     fn spawn(&self) -> BoxTaskFuture {
///         Box::pin(async move {
///             // poll forever...
///             Ok::<(), TaskError>(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates a new future for one execution of the task.
    fn spawn(&self) -> BoxTaskFuture;
}
