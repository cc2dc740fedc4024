//! # Startup hooks.
//!
//! - [`Hook`] - trait for a named, async bootstrap step
//! - [`HookFn`] - closure-backed implementation
//! - [`HookRef`] - shared reference to a hook (`Arc<dyn Hook>`)
//! - [`HookSpec`] - hook bundled with its priority
//! - [`priority`] - `FIRST` / `LAST` constants

mod hook;
mod hook_fn;
pub mod priority;
mod spec;

pub use hook::{Hook, HookRef};
pub use hook_fn::HookFn;
pub use spec::HookSpec;
