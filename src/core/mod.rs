//! Runtime core: sequencing, launching and supervision.
//!
//! Internal modules:
//! - [`sequencer`]: runs registered hooks in priority order;
//! - [`registry`]: stores hooks and computes the run order;
//! - [`builder`]: assembles a sequencer with its bus and subscribers;
//! - [`context`]: what a hook body can reach;
//! - [`launcher`]: fire-and-forget and supervised launches;
//! - [`supervisor`]: restart loop for one critical task;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod config;
mod context;
mod launcher;
mod registry;
mod sequencer;
mod shutdown;
mod supervisor;

pub use builder::SequencerBuilder;
pub use config::SequencerConfig;
pub use context::HookContext;
pub use launcher::Launcher;
pub use sequencer::Sequencer;
pub use shutdown::wait_for_shutdown_signal;
pub use supervisor::{FailureSignal, SupervisedHandle, SupervisedState};
