//! Driven port for the per-user key/value session.
//!
//! The store is synchronous: the HTTP adapter wraps the actix session, which
//! is already materialised before a handler runs, and tests use
//! [`MemorySessionStore`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session stores.
    pub enum SessionStoreError {
        /// Stored value could not be read back.
        Read { message: String } => "session read failed: {message}",
        /// Value could not be written.
        Write { message: String } => "session write failed: {message}",
    }
}

/// String key/value storage scoped to one browser session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn insert(&self, key: &str, value: String) -> Result<(), SessionStoreError>;

    /// Remove `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

/// In-memory store for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RefCell::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Whether `key` currently holds a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn insert(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.entries.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemorySessionStore::new();
        store.insert("k", "v".to_owned()).expect("insert");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
        store.remove("k");
        store.remove("k");
        assert!(store.is_empty());
    }
}
