use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::{SoftDelete, StoreError, Versioned, INITIAL_VERSION};

struct Inner<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

/// Process-local entity collection.
///
/// Ids are assigned sequentially from 1, so [`scan`](Self::scan) returns
/// entities in insertion order. Reads clone a snapshot under a shared lock;
/// writes take the exclusive lock for the duration of the version check.
pub struct InMemoryStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: Versioned> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Versioned> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Store a new entity; its id and version are assigned here.
    pub fn insert(&self, mut entity: T) -> T {
        let mut g = self.inner.write();
        let id = g.next_id;
        g.next_id += 1;
        entity.set_id(id);
        entity.set_version(INITIAL_VERSION);
        g.rows.insert(id, entity.clone());
        entity
    }

    /// Store a batch under one lock. Either every entity lands or none does;
    /// validation happens before the call, so the batch cannot fail midway.
    pub fn insert_all(&self, entities: Vec<T>) -> Vec<T> {
        let mut g = self.inner.write();
        let mut stored = Vec::with_capacity(entities.len());
        for mut entity in entities {
            let id = g.next_id;
            g.next_id += 1;
            entity.set_id(id);
            entity.set_version(INITIAL_VERSION);
            g.rows.insert(id, entity.clone());
            stored.push(entity);
        }
        stored
    }

    pub fn get(&self, id: i64) -> Result<T, StoreError> {
        self.inner
            .read()
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// First entity (in id order) matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.inner.read().rows.values().find(|e| pred(e)).cloned()
    }

    /// Replace entity `id` with `new_state` if its stored version still equals
    /// `expected_version`. The stored copy gets `expected_version + 1`.
    pub fn update_if_version_matches(
        &self,
        id: i64,
        mut new_state: T,
        expected_version: i64,
    ) -> Result<T, StoreError> {
        let mut g = self.inner.write();
        let current = g.rows.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        let actual = current.version();
        if actual != expected_version {
            debug!(id, expected_version, actual, "version check failed");
            return Err(StoreError::Conflict {
                id,
                expected: expected_version,
                actual,
            });
        }
        new_state.set_id(id);
        new_state.set_version(expected_version + 1);
        *current = new_state.clone();
        Ok(new_state)
    }

    /// Hard delete.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner
            .write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }

    /// Consistent copy of the whole collection in insertion order.
    pub fn scan(&self) -> Vec<T> {
        self.inner.read().rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: SoftDelete> InMemoryStore<T> {
    /// Soft delete: clear the `active` flag through the same version check as
    /// any other write. `touch` runs on the new state (e.g. to bump
    /// `updated_at`).
    pub fn mark_inactive(
        &self,
        id: i64,
        expected_version: i64,
        touch: impl FnOnce(&mut T),
    ) -> Result<T, StoreError> {
        let mut next = self.get(id)?;
        next.set_active(false);
        touch(&mut next);
        self.update_if_version_matches(id, next, expected_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: i64,
        version: i64,
        text: String,
        active: bool,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: 0,
                version: 99,
                text: text.to_string(),
                active: true,
            }
        }
    }

    impl Versioned for Note {
        fn id(&self) -> i64 {
            self.id
        }
        fn set_id(&mut self, id: i64) {
            self.id = id;
        }
        fn version(&self) -> i64 {
            self.version
        }
        fn set_version(&mut self, version: i64) {
            self.version = version;
        }
    }

    impl SoftDelete for Note {
        fn is_active(&self) -> bool {
            self.active
        }
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }
    }

    #[test]
    fn insert_assigns_sequential_ids_and_initial_version() {
        let store = InMemoryStore::new();
        let a = store.insert(Note::new("a"));
        let b = store.insert(Note::new("b"));
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.version, INITIAL_VERSION);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn stale_version_is_rejected_and_state_kept() {
        let store = InMemoryStore::new();
        let a = store.insert(Note::new("a"));

        let mut edit = a.clone();
        edit.text = "first".into();
        let saved = store.update_if_version_matches(a.id, edit, 0).unwrap();
        assert_eq!(saved.version, 1);

        let mut stale = a.clone();
        stale.text = "second".into();
        let err = store.update_if_version_matches(a.id, stale, 0).unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                id: 1,
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(store.get(a.id).unwrap().text, "first");
    }

    #[test]
    fn mark_inactive_keeps_row() {
        let store = InMemoryStore::new();
        let a = store.insert(Note::new("a"));
        let gone = store
            .mark_inactive(a.id, a.version, |n| n.text.push_str(" (archived)"))
            .unwrap();
        assert!(!gone.active);
        assert_eq!(gone.version, 1);
        assert_eq!(store.scan().len(), 1);
        assert_eq!(store.get(a.id).unwrap().text, "a (archived)");
    }

    #[test]
    fn delete_and_missing_ids() {
        let store: InMemoryStore<Note> = InMemoryStore::new();
        assert_eq!(store.get(7), Err(StoreError::NotFound { id: 7 }));
        let a = store.insert(Note::new("a"));
        store.delete(a.id).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.delete(a.id), Err(StoreError::NotFound { id: a.id }));
    }
}
