//! Keyed handler registry shared by semantic and native listeners.
//!
//! Each key maps to an insertion-ordered collection of handlers that is
//! unique by `Rc` identity: registering the same `Rc` twice stores it once.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// Mapping from key to an ordered, identity-unique list of handlers.
pub struct Registry<K, F: ?Sized> {
    entries: HashMap<K, Vec<Rc<F>>>,
}

impl<K: Eq + Hash, F: ?Sized> Registry<K, F> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `handler` under `key`.
    ///
    /// Returns `false` (and changes nothing) if that exact handler is already
    /// registered under the key.
    pub fn insert(&mut self, key: K, handler: Rc<F>) -> bool {
        let handlers = self.entries.entry(key).or_default();
        if handlers.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Unregister `handler` from `key`. Returns `false` if it was not present.
    pub fn remove<Q>(&mut self, key: &Q, handler: &Rc<F>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(handlers) = self.entries.get_mut(key) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|h| !Rc::ptr_eq(h, handler));
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    /// Whether `handler` is currently registered under `key`.
    pub fn contains<Q>(&self, key: &Q, handler: &Rc<F>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .get(key)
            .is_some_and(|handlers| handlers.iter().any(|h| Rc::ptr_eq(h, handler)))
    }

    /// Clone the handler list for `key` so it can be invoked without holding
    /// a borrow of the registry.
    pub fn snapshot<Q>(&self, key: &Q) -> Vec<Rc<F>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Number of handlers registered under `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).map_or(0, Vec::len)
    }

    /// Remove every handler under `key`, returning how many were removed.
    pub fn clear_key<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key).map_or(0, |handlers| handlers.len())
    }

    /// Drop every key whose predicate returns `false`.
    pub fn retain_keys(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total number of handlers across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, F: ?Sized> Default for Registry<K, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, F: ?Sized> fmt::Debug for Registry<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Handler = dyn Fn() -> u32;

    fn handler(n: u32) -> Rc<Handler> {
        Rc::new(move || n)
    }

    #[test]
    fn insert_is_unique_by_identity() {
        let mut reg: Registry<String, Handler> = Registry::new();
        let h = handler(1);
        assert!(reg.insert("x".into(), h.clone()));
        assert!(!reg.insert("x".into(), h.clone()));
        assert_eq!(reg.count("x"), 1);

        // Same behaviour, different allocation: a distinct handler.
        assert!(reg.insert("x".into(), handler(1)));
        assert_eq!(reg.count("x"), 2);
    }

    #[test]
    fn same_handler_under_two_keys() {
        let mut reg: Registry<String, Handler> = Registry::new();
        let h = handler(1);
        reg.insert("a".into(), h.clone());
        reg.insert("b".into(), h.clone());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let mut reg: Registry<&'static str, Handler> = Registry::new();
        for n in [3, 1, 2] {
            reg.insert("k", handler(n));
        }
        let order: Vec<u32> = reg.snapshot("k").iter().map(|h| h()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut reg: Registry<String, Handler> = Registry::new();
        assert!(!reg.remove("x", &handler(1)));
        reg.insert("x".into(), handler(2));
        assert!(!reg.remove("x", &handler(2)));
        assert_eq!(reg.count("x"), 1);
    }

    #[test]
    fn remove_last_handler_drops_key() {
        let mut reg: Registry<String, Handler> = Registry::new();
        let h = handler(1);
        reg.insert("x".into(), h.clone());
        assert!(reg.remove("x", &h));
        assert!(reg.is_empty());
        assert!(!reg.contains("x", &h));
    }

    #[test]
    fn snapshot_is_detached_from_registry() {
        let calls = Rc::new(Cell::new(0));
        let mut reg: Registry<String, dyn Fn()> = Registry::new();
        let counter = calls.clone();
        let h: Rc<dyn Fn()> = Rc::new(move || counter.set(counter.get() + 1));
        reg.insert("x".into(), h.clone());
        let snapshot = reg.snapshot("x");
        reg.remove("x", &h);
        for f in snapshot {
            f();
        }
        assert_eq!(calls.get(), 1);
        assert!(reg.snapshot("x").is_empty());
    }

    #[test]
    fn clear_key_and_retain() {
        let mut reg: Registry<u32, Handler> = Registry::new();
        reg.insert(1, handler(1));
        reg.insert(1, handler(2));
        reg.insert(2, handler(3));
        reg.insert(3, handler(4));
        assert_eq!(reg.clear_key(&1), 2);
        reg.retain_keys(|k| *k != 2);
        assert_eq!(reg.len(), 1);
        reg.clear();
        assert!(reg.is_empty());
    }
}
