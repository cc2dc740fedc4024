//! Well-known hook priorities.
//!
//! Core hooks count down from [`FIRST`] (`FIRST - 1`, `FIRST - 2`, ...).
//! Plugins pick any value in between. [`LAST`] is the lowest representable
//! priority, so only another hook registered at [`LAST`] itself can run after
//! it; hooks sharing it run in registration order.

/// Highest priority; runs before everything else.
pub const FIRST: i32 = i32::MAX;

/// Lowest priority; runs after every hook with a higher priority, including ones
/// registered later.
///
/// The value is not reserved: a hook registered later at `LAST` as well ties
/// with it and runs after it. Plugins should use `LAST + 1` or above.
pub const LAST: i32 = i32::MIN;
