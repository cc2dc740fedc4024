//! # bootvisor
//!
//! **Bootvisor** is a priority-ordered startup sequencer with a single-task supervisor.
//!
//! Named bootstrap steps (hooks) run one after another, highest priority first.
//! A hook may launch background work: fire-and-forget tasks that nobody watches,
//! or a supervised task whose crashes are caught by a dedicated loop and answered
//! with a relaunch after a fixed delay, forever.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   register(HookSpec)   register(HookSpec)   register(HookSpec)
//!          │                    │                    │
//!          ▼                    ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Sequencer                                                        │
//! │  - Registry   (hooks, sorted by priority desc, stable on ties)    │
//! │  - Resources  (typed values written by early hooks)               │
//! │  - Launcher   (spawn / supervise, handed to hooks)                │
//! │  - Bus        (broadcast events)                                  │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ run(): await hook 1 ─► await hook 2 ─► ... ─► await hook N
//!        ▼
//!   HookContext ──► Launcher::spawn(task)      ─► tokio task (unobserved)
//!               └─► Launcher::supervise(task)  ─► supervisor loop
//!                                                  ├─► tokio task (attempt n)
//!                                                  ├─► join: Err / panic
//!                                                  ├─► FailureSignal, log
//!                                                  ├─► sleep(restart_delay)
//!                                                  └─► attempt n + 1
//! ```
//!
//! ### Failure policy
//! - A hook error aborts the sequence and is returned unchanged by [`Sequencer::run`].
//! - A supervised task fault never reaches the sequencer; it is logged, published
//!   as [`EventKind::TaskFailed`], and followed by exactly one relaunch.
//! - A fire-and-forget task's outcome is not observed at all.
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                         |
//! |-------------------|------------------------------------------------------------|--------------------------------------------|
//! | **Hooks**         | Named, prioritized async startup steps.                    | [`Hook`], [`HookFn`], [`HookSpec`]         |
//! | **Sequencing**    | Ordered, fail-fast execution of hooks.                     | [`Sequencer`], [`priority`]                |
//! | **Launching**     | Fire-and-forget and supervised background tasks.           | [`Launcher`], [`Task`], [`TaskFn`]         |
//! | **Supervision**   | Fixed-delay, unbounded restart of one critical task.       | [`SupervisedHandle`], [`FailureSignal`]    |
//! | **Shared state**  | Values passed from early hooks to later ones.              | [`Resources`]                              |
//! | **Events**        | Lifecycle events and pluggable observers.                  | [`Bus`], [`Event`], [`Subscribe`]          |
//! | **Errors**        | Typed errors for registration, hooks and tasks.            | [`SequenceError`], [`HookError`], [`TaskError`] |
//!
//! ## Example
//! ```rust
//! use bootvisor::{
//!     priority, HookContext, HookError, Sequencer, SequencerConfig, TaskError, TaskFn,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut seq = Sequencer::builder(SequencerConfig::default()).build();
//!
//!     seq.register_fn("init_redis", priority::FIRST - 4, |ctx: HookContext| async move {
//!         ctx.resources().insert(String::from("redis://127.0.0.1:6379"));
//!         Ok::<_, HookError>(())
//!     })?;
//!
//!     seq.register_fn("start_blockfeed", priority::FIRST - 6, |ctx: HookContext| async move {
//!         let url = ctx.resources().require::<String>()?;
//!         ctx.supervise(TaskFn::arc("blockfeed", move || {
//!             let _url = url.clone();
//!             async move {
//!                 // process the feed until it breaks...
//!                 Ok::<(), TaskError>(())
//!             }
//!         }))?;
//!         Ok::<_, HookError>(())
//!     })?;
//!
//!     seq.run().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod hooks;
mod panic;
mod resources;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{
    FailureSignal, HookContext, Launcher, Sequencer, SequencerBuilder, SequencerConfig,
    SupervisedHandle, SupervisedState, wait_for_shutdown_signal,
};
pub use error::{BoxError, HookError, LaunchError, ResourceError, SequenceError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use hooks::{Hook, HookFn, HookRef, HookSpec, priority};
pub use resources::Resources;
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};
