//! # Sequencer configuration.
//!
//! Provides [`SequencerConfig`], the settings shared by the sequencer, the
//! launcher it hands to hooks, and every supervisor loop started through it.

use std::time::Duration;

/// Runtime settings for a [`Sequencer`](crate::Sequencer).
///
/// ## Field semantics
/// - `restart_delay`: fixed pause between a supervised task's crash and its relaunch
///   (no growth, no jitter, applied before every restart)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by `Bus`)
#[derive(Clone, Debug)]
pub struct SequencerConfig {
    /// Delay before relaunching a crashed supervised task.
    pub restart_delay: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events get `Lagged`
    /// and skip older items.
    pub bus_capacity: usize,
}

impl SequencerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SequencerConfig {
    /// Default configuration:
    ///
    /// - `restart_delay = 2s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            restart_delay: Duration::from_secs(2),
            bus_capacity: 1024,
        }
    }
}
