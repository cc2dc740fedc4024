//! Error types used by the bootvisor sequencer, launcher and tasks.
//!
//! This module defines:
//!
//! - [`SequenceError`]: errors raised by registration or by [`Sequencer::run`](crate::Sequencer::run).
//! - [`HookError`]: the error a hook body returns; carried unchanged inside [`SequenceError::HookFailed`].
//! - [`TaskError`]: errors raised by spawned or supervised tasks.
//! - [`LaunchError`]: misuse of the [`Launcher`](crate::Launcher).
//! - [`ResourceError`]: lookups of resources that no earlier hook provided.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error type accepted by [`HookError::new`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// # Errors produced by the sequencer.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SequenceError {
    /// A hook returned an error; the remaining hooks were not run.
    #[error("hook `{hook}` failed: {source}")]
    HookFailed {
        /// Name of the failing hook.
        hook: String,
        /// The error returned by the hook, unchanged.
        #[source]
        source: HookError,
    },

    /// A hook with the same name is already registered.
    #[error("hook `{name}` is already registered")]
    DuplicateHook {
        /// The conflicting hook name.
        name: String,
    },
}

impl SequenceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bootvisor::SequenceError;
    ///
    /// let err = SequenceError::DuplicateHook { name: "init_db".into() };
    /// assert_eq!(err.as_label(), "sequence_duplicate_hook");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SequenceError::HookFailed { .. } => "sequence_hook_failed",
            SequenceError::DuplicateHook { .. } => "sequence_duplicate_hook",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SequenceError::HookFailed { hook, source } => {
                format!("hook={hook} error={source}")
            }
            SequenceError::DuplicateHook { name } => format!("duplicate hook={name}"),
        }
    }

    /// Name of the hook this error is about.
    pub fn hook_name(&self) -> &str {
        match self {
            SequenceError::HookFailed { hook, .. } => hook,
            SequenceError::DuplicateHook { name } => name,
        }
    }

    /// Returns the hook's own error if this is [`SequenceError::HookFailed`].
    pub fn into_hook_error(self) -> Option<HookError> {
        match self {
            SequenceError::HookFailed { source, .. } => Some(source),
            SequenceError::DuplicateHook { .. } => None,
        }
    }
}

/// # Error returned by a hook body.
///
/// Wraps any error type so that the exact error raised by the hook can be
/// recovered by the caller of [`Sequencer::run`](crate::Sequencer::run).
///
/// # Example
/// ```
/// use bootvisor::HookError;
///
/// let err = HookError::new("config missing");
/// assert_eq!(err.to_string(), "config missing");
/// ```
#[derive(Debug)]
pub struct HookError {
    inner: BoxError,
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for HookError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

impl HookError {
    /// Wraps an error (or a message) as a hook failure.
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self { inner: err.into() }
    }

    /// Returns a reference to the wrapped error if it is of type `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Unwraps into the boxed inner error.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl From<ResourceError> for HookError {
    fn from(err: ResourceError) -> Self {
        HookError::new(err)
    }
}

impl From<LaunchError> for HookError {
    fn from(err: LaunchError) -> Self {
        HookError::new(err)
    }
}

/// # Errors produced by task execution.
///
/// These represent failures of spawned or supervised tasks. They never reach
/// the sequencer: supervised failures become a [`FailureSignal`](crate::FailureSignal),
/// fire-and-forget failures are left to the task itself.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Task panicked.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use bootvisor::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns the bare message without the kind prefix.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { reason } => reason.clone(),
            TaskError::Panicked { info } => info.clone(),
        }
    }
}

/// # Errors produced by the launcher.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The task name is already under supervision.
    #[error("task `{name}` is already supervised")]
    AlreadySupervised {
        /// The task name.
        name: String,
    },
}

/// # Errors produced by resource lookups.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No resource of the requested type was inserted.
    #[error("resource `{type_name}` is not available")]
    Missing {
        /// Name of the requested type.
        type_name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("bad value {0}")]
    struct ValueError(i32);

    #[test]
    fn hook_error_keeps_original_error() {
        let err = HookError::new(ValueError(7));
        assert_eq!(err.downcast_ref::<ValueError>(), Some(&ValueError(7)));
        assert_eq!(err.to_string(), "bad value 7");
    }

    #[test]
    fn hook_failed_exposes_source() {
        let err = SequenceError::HookFailed {
            hook: "init_db".into(),
            source: HookError::new(ValueError(1)),
        };
        assert_eq!(err.hook_name(), "init_db");
        assert_eq!(err.to_string(), "hook `init_db` failed: bad value 1");
        assert!(StdError::source(&err).is_some());

        let inner = err.into_hook_error().expect("hook error");
        assert!(inner.downcast_ref::<ValueError>().is_some());
    }

    #[test]
    fn task_error_labels() {
        let panicked = TaskError::Panicked { info: "oops".into() };
        assert_eq!(panicked.as_label(), "task_panicked");
        assert_eq!(panicked.as_message(), "oops");
        assert_eq!(TaskError::fail("x").to_string(), "execution failed: x");
    }
}
