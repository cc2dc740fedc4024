//! # Startup hook abstraction.
//!
//! A [`Hook`] is one named bootstrap step. The sequencer awaits
//! [`Hook::run`] to completion before starting the next hook; anything the hook
//! launches through its [`HookContext`] keeps running on its own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::HookContext;
use crate::error::HookError;

/// Shared handle to a hook.
pub type HookRef = Arc<dyn Hook>;

/// # Named bootstrap step.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use bootvisor::{Hook, HookContext, HookError};
///
/// struct WarnOnMissingSupportEmail;
///
/// #[async_trait]
/// impl Hook for WarnOnMissingSupportEmail {
///     fn name(&self) -> &str { "warn_on_missing_support_email" }
///
///     async fn run(&self, ctx: HookContext) -> Result<(), HookError> {
///         if ctx.resources().get::<String>().is_none() {
///             tracing::warn!("support email setting not set");
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    /// Returns a stable, human-readable hook name.
    fn name(&self) -> &str;

    /// Runs the step. An error aborts the remaining startup sequence.
    async fn run(&self, ctx: HookContext) -> Result<(), HookError>;
}
