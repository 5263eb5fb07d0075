//! Shared value set.
//!
//! A name→scalar store owned by the window/container and read or written by
//! screens. Screens never look values up by string at event time: they are
//! handed a [`ScalarHandle`] at construction and go through it directly.
//!
//! Single logical thread of control, so plain `Rc<Cell<_>>` sharing is
//! sufficient.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Cloneable handle to one scalar in a [`ValueSet`].
///
/// Clones share storage: a `set` through any handle is observed by all
/// holders and by name lookups on the owning set.
#[derive(Debug, Clone)]
pub struct ScalarHandle(Rc<Cell<f64>>);

impl ScalarHandle {
    /// Creates a free-standing handle not registered in any set.
    ///
    /// Useful for tests and for screens driven without a container.
    #[inline]
    pub fn detached(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.0.set(value);
    }
}

/// Name→scalar store.
#[derive(Debug, Default)]
pub struct ValueSet {
    values: HashMap<String, ScalarHandle>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scalar and returns its handle.
    ///
    /// Re-inserting an existing name keeps the old handle alive but detaches
    /// it from the set; callers are expected to register each name once.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> ScalarHandle {
        let handle = ScalarHandle::detached(value);
        self.values.insert(name.into(), handle.clone());
        handle
    }

    /// Returns a handle to a registered scalar.
    pub fn scalar(&self, name: &str) -> Option<ScalarHandle> {
        self.values.get(name).cloned()
    }

    /// Reads a registered scalar's current value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).map(ScalarHandle::get)
    }

    /// Writes a registered scalar. Returns false when the name is unknown.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.values.get(name) {
            Some(handle) => {
                handle.set(value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_read_back() {
        let mut set = ValueSet::new();
        set.insert("zoom ratio", 0.5);
        assert_eq!(set.get("zoom ratio"), Some(0.5));
        assert_eq!(set.get("missing"), None);
    }

    #[test]
    fn handles_share_storage() {
        let mut set = ValueSet::new();
        let handle = set.insert("zoom ratio", 0.5);
        let clone = set.scalar("zoom ratio").unwrap();

        clone.set(0.25);
        assert_eq!(handle.get(), 0.25);
        assert_eq!(set.get("zoom ratio"), Some(0.25));
    }

    #[test]
    fn set_by_name_reaches_handles() {
        let mut set = ValueSet::new();
        let handle = set.insert("speed", 1.0);
        assert!(set.set("speed", 3.0));
        assert_eq!(handle.get(), 3.0);
        assert!(!set.set("missing", 1.0));
    }
}
