//! # Hook registration entry.
//!
//! [`HookSpec`] pairs a hook with the priority it runs at. Specs are immutable
//! once built and are moved into the sequencer's registry on registration.

use crate::hooks::hook::HookRef;

/// A hook plus its priority (higher runs earlier).
///
/// ## Example
/// ```rust
/// use bootvisor::{priority, HookContext, HookError, HookFn, HookSpec};
///
/// let spec = HookSpec::new(
///     HookFn::arc("start_api", |_ctx: HookContext| async { Ok::<_, HookError>(()) }),
///     priority::LAST,
/// );
/// assert_eq!(spec.name(), "start_api");
/// assert_eq!(spec.priority(), i32::MIN);
/// ```
#[derive(Clone)]
pub struct HookSpec {
    hook: HookRef,
    priority: i32,
}

impl HookSpec {
    /// Creates a new hook specification.
    pub fn new(hook: HookRef, priority: i32) -> Self {
        Self { hook, priority }
    }

    /// Returns reference to the hook.
    pub fn hook(&self) -> &HookRef {
        &self.hook
    }

    /// Convenience: returns the hook name.
    pub fn name(&self) -> &str {
        self.hook.name()
    }

    /// Returns the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }
}
