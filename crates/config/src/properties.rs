//! Typed property bag shared by everything registered on a builder

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared state attached to a [`ConfigurationBuilder`](crate::ConfigurationBuilder).
///
/// Entries are keyed by their Rust type, so two extensions can only collide
/// if they agree on the same type. Each type has exactly one slot and the
/// last insert wins.
#[derive(Clone, Default)]
pub struct Properties {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Properties {
    /// Create an empty property bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the one it replaced
    pub fn insert<T>(&mut self, value: T) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.entries
            .insert(TypeId::of::<T>(), Arc::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// Borrow the value stored for `T`
    #[must_use]
    pub fn get<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>())
    }

    /// Remove and return the value stored for `T`
    pub fn remove<T>(&mut self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    /// Check whether a value is stored for `T`
    #[must_use]
    pub fn contains<T>(&self) -> bool
    where
        T: Any + Send + Sync,
    {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Properties")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Region(&'static str);

    #[derive(Debug, PartialEq)]
    struct Retries(u32);

    #[test]
    fn test_last_insert_wins() {
        let mut properties = Properties::new();
        assert!(properties.insert(Region("eu-west-1")).is_none());

        let previous = properties.insert(Region("us-east-1"));
        assert_eq!(previous.as_deref(), Some(&Region("eu-west-1")));
        assert_eq!(properties.get::<Region>(), Some(&Region("us-east-1")));
        assert_eq!(properties.len(), 1);
    }

    #[test]
    fn test_slots_are_per_type() {
        let mut properties = Properties::new();
        properties.insert(Region("eu-west-1"));
        properties.insert(Retries(3));

        assert_eq!(properties.get::<Retries>(), Some(&Retries(3)));
        assert!(properties.contains::<Region>());

        let removed = properties.remove::<Region>();
        assert_eq!(removed.as_deref(), Some(&Region("eu-west-1")));
        assert!(!properties.contains::<Region>());
        assert!(properties.get::<Region>().is_none());
    }

    #[test]
    fn test_missing_type_is_absent() {
        let properties = Properties::new();
        assert!(properties.is_empty());
        assert!(properties.get::<Retries>().is_none());
    }
}
