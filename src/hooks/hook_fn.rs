//! # Function-backed hook (`HookFn`)
//!
//! [`HookFn`] wraps a closure `F: Fn(HookContext) -> Fut` so that a startup step
//! can be registered without declaring a type for it.
//!
//! ## Example
//! ```rust
//! use bootvisor::{HookContext, HookError, HookFn, HookRef};
//!
//! let hook: HookRef = HookFn::arc("init_redis", |ctx: HookContext| async move {
//!     ctx.resources().insert(String::from("redis://127.0.0.1"));
//!     Ok::<_, HookError>(())
//! });
//!
//! assert_eq!(hook.name(), "init_redis");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::HookContext;
use crate::error::HookError;
use crate::hooks::hook::Hook;

/// Function-backed hook implementation.
pub struct HookFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HookFn<F> {
    /// Creates a new function-backed hook.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the hook and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Hook for HookFn<F>
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: HookContext) -> Result<(), HookError> {
        (self.f)(ctx).await
    }
}
