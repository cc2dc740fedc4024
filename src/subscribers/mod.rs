//! # Event subscribers.
//!
//! Observers of the [`Bus`](crate::Bus) plugged in through
//! [`SequencerBuilder::with_subscribers`](crate::SequencerBuilder::with_subscribers).
//!
//! ```text
//! Sequencer / Launcher / supervisor loops ── publish(Event) ──► Bus
//!                                                                │
//!                                                  subscriber listener
//!                                                                │
//!                                                        SubscriberSet::emit
//!                                                    ┌───────────┼───────────┐
//!                                                    ▼           ▼           ▼
//!                                                  sub1        sub2   ...  subN
//! ```

mod subscribe;
mod subscriber_set;

pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
