//! # Background tasks launched by hook bodies.
//!
//! - [`Task`] - trait for a named factory of background futures
//! - [`TaskFn`] - closure-backed implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
