//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! launch. Nothing is shared between executions unless the closure captures it
//! explicitly (typically an `Arc` cloned out of [`Resources`](crate::Resources)).
//!
//! ## Example
//! ```rust
//! use bootvisor::{TaskError, TaskFn, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc("expire_stale_prefs", || async move {
//!     // periodic maintenance loop...
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(t.name(), "expire_stale_prefs");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task};

/// Function-backed task implementation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self) -> BoxTaskFuture {
        Box::pin((self.f)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn each_spawn_creates_a_fresh_future() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let task = TaskFn::arc("counter", move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), TaskError>(())
            }
        });

        let first = task.spawn();
        let second = task.spawn();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        first.await.expect("first run");
        second.await.expect("second run");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
