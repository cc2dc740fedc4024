//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the sequencer, the launcher,
//! supervisor loops and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Sequencer::run`, `Launcher::spawn`, supervisor loops,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the sequencer's subscriber listener (fans out to `SubscriberSet`)
//!   and anyone holding a receiver from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
