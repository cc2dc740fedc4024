//! # Typed resource store shared by hooks.
//!
//! [`Resources`] replaces process-wide mutable configuration: an early hook
//! inserts a value (configuration, connection pool, client...) and later hooks
//! or the tasks they launch read it back by type.
//!
//! Values are keyed by their Rust type and handed out as `Arc<T>`. Inserting a
//! second value of the same type replaces the first.
//!
//! ## Example
//! ```rust
//! use bootvisor::Resources;
//!
//! struct Settings { support_email: Option<String> }
//!
//! let res = Resources::new();
//! res.insert(Settings { support_email: None });
//!
//! let settings = res.require::<Settings>().unwrap();
//! assert!(settings.support_email.is_none());
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ResourceError;

type Entry = Arc<dyn Any + Send + Sync>;

/// Cloneable handle to a shared, type-keyed resource map.
#[derive(Clone, Default)]
pub struct Resources {
    inner: Arc<RwLock<HashMap<TypeId, Entry>>>,
}

impl Resources {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the value of the same type it replaced.
    pub fn insert<T: Send + Sync + 'static>(&self, value: T) -> Option<Arc<T>> {
        let previous = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), Arc::new(value));
        previous.and_then(|entry| entry.downcast::<T>().ok())
    }

    /// Returns the stored value of type `T`, if any.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let entry = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()?;
        entry.downcast::<T>().ok()
    }

    /// Returns the stored value of type `T` or [`ResourceError::Missing`].
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ResourceError> {
        self.get::<T>().ok_or(ResourceError::Missing {
            type_name: type_name::<T>(),
        })
    }

    /// Returns `true` if a value of type `T` is stored.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct DbUrl(&'static str);

    #[test]
    fn insert_then_get_by_type() {
        let res = Resources::new();
        assert!(res.is_empty());
        assert!(res.insert(DbUrl("mongodb://localhost")).is_none());
        res.insert(7u32);

        assert_eq!(res.len(), 2);
        assert_eq!(*res.require::<DbUrl>().expect("db url"), DbUrl("mongodb://localhost"));
        assert_eq!(res.get::<u32>().as_deref(), Some(&7));
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let res = Resources::new();
        res.insert(DbUrl("a"));
        let previous = res.insert(DbUrl("b")).expect("previous value");

        assert_eq!(*previous, DbUrl("a"));
        assert_eq!(*res.require::<DbUrl>().expect("db url"), DbUrl("b"));
    }

    #[test]
    fn missing_resource_names_the_type() {
        let res = Resources::new();
        let err = res.require::<DbUrl>().unwrap_err();
        assert!(matches!(err, ResourceError::Missing { type_name } if type_name.ends_with("DbUrl")));
        assert!(!res.contains::<DbUrl>());
    }

    #[test]
    fn clones_share_the_same_store() {
        let res = Resources::new();
        let other = res.clone();
        other.insert(String::from("shared"));
        assert!(res.contains::<String>());
    }
}
