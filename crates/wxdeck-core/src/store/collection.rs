// ── Generic keyed collection ──
//
// Insertion-ordered entities keyed by id. Clones share storage until the
// next mutation, so snapshots handed to subscribers are cheap.

use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

/// An ordered, keyed set of entities.
///
/// Order is the order entities arrived in: a fetch keeps the backend's
/// order and creates append at the end. Removal keeps the remaining order.
#[derive(Debug)]
pub struct Collection<K, T> {
    items: Arc<IndexMap<K, Arc<T>>>,
}

impl<K, T> Clone for Collection<K, T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<K, T> Default for Collection<K, T> {
    fn default() -> Self {
        Self {
            items: Arc::new(IndexMap::new()),
        }
    }
}

impl<K: Hash + Eq + Clone, T> Collection<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents, keeping the incoming order.
    pub(crate) fn replace_all(&mut self, items: impl IntoIterator<Item = (K, T)>) {
        self.items = Arc::new(
            items
                .into_iter()
                .map(|(k, v)| (k, Arc::new(v)))
                .collect(),
        );
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    /// Updating keeps the entity's position.
    pub(crate) fn upsert(&mut self, key: K, entity: T) -> bool {
        Arc::make_mut(&mut self.items)
            .insert(key, Arc::new(entity))
            .is_none()
    }

    /// Replace an entity only if the key is already present.
    pub(crate) fn replace(&mut self, key: &K, entity: T) -> bool {
        if !self.items.contains_key(key) {
            return false;
        }
        Arc::make_mut(&mut self.items).insert(key.clone(), Arc::new(entity));
        true
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&mut self, key: &K) -> Option<Arc<T>> {
        if !self.items.contains_key(key) {
            return None;
        }
        Arc::make_mut(&mut self.items).shift_remove(key)
    }

    pub(crate) fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items = Arc::new(IndexMap::new());
        }
    }

    pub fn get(&self, key: &K) -> Option<Arc<T>> {
        self.items.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.items.values()
    }

    /// Entities in order, as an owned list.
    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.items.values().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_key() {
        let mut col: Collection<i64, String> = Collection::new();
        assert!(col.upsert(1, "hello".into()));
        assert!(!col.upsert(1, "world".into()));
        assert_eq!(*col.get(&1).unwrap(), "world");
    }

    #[test]
    fn update_keeps_position() {
        let mut col: Collection<i64, &str> = Collection::new();
        col.replace_all([(1, "a"), (2, "b"), (3, "c")]);
        assert!(col.replace(&2, "B"));
        assert!(!col.replace(&9, "z"));

        let values: Vec<&str> = col.iter().map(|v| **v).collect();
        assert_eq!(values, ["a", "B", "c"]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut col: Collection<i64, &str> = Collection::new();
        col.replace_all([(1, "a"), (2, "b"), (3, "c")]);

        assert_eq!(*col.remove(&2).unwrap(), "b");
        assert!(col.remove(&2).is_none());
        assert_eq!(col.keys().copied().collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn clones_are_isolated_snapshots() {
        let mut col: Collection<String, u8> = Collection::new();
        col.upsert("a".into(), 1);
        let snapshot = col.clone();

        col.upsert("b".into(), 2);
        col.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(col.is_empty());
    }
}
