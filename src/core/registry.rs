//! # Hook registry.
//!
//! Insertion-ordered list of [`HookSpec`]s, filled during the registration
//! phase and consumed once by [`Sequencer::run`](crate::Sequencer::run).
//!
//! ## Rules
//! - Hook names are unique
//! - Run order is descending priority; equal priorities keep registration order
//!   (`sort_by` is stable)

use crate::error::SequenceError;
use crate::hooks::HookSpec;

#[derive(Default)]
pub(crate) struct Registry {
    hooks: Vec<HookSpec>,
}

impl Registry {
    /// Appends a hook, rejecting duplicate names.
    pub(crate) fn register(&mut self, spec: HookSpec) -> Result<(), SequenceError> {
        if self.hooks.iter().any(|h| h.name() == spec.name()) {
            return Err(SequenceError::DuplicateHook {
                name: spec.name().to_string(),
            });
        }
        self.hooks.push(spec);
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Hook names in the order they will run.
    pub(crate) fn plan(&self) -> Vec<String> {
        let mut order: Vec<&HookSpec> = self.hooks.iter().collect();
        order.sort_by(|a, b| b.priority().cmp(&a.priority()));
        order.into_iter().map(|h| h.name().to_string()).collect()
    }

    /// Consumes the registry, returning hooks in run order.
    pub(crate) fn into_sorted(self) -> Vec<HookSpec> {
        let mut hooks = self.hooks;
        hooks.sort_by(|a, b| b.priority().cmp(&a.priority()));
        hooks
    }
}
