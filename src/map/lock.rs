//! Lock-guarded map
//!
//! HashMap behind a `parking_lot::RwLock`.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use super::SyncMap;

/// Hash map allowing concurrent reads and exclusive writes
///
/// ## Concurrency:
/// - `get` / `range` / `len`: shared lock, run in parallel with each other
/// - `set` / `delete`: exclusive lock, exclude readers and other writers
/// - `range` keeps the shared lock until iteration stops, so writers wait
///   for the full visit
///
/// `parking_lot` locks do not poison. A visitor that panics inside `range`
/// unwinds through the read guard and leaves the map usable.
pub struct LockGuardedMap<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> LockGuardedMap<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        tracing::trace!(capacity, "creating lock-guarded map");
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Look up `key` under the shared lock
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.entries.read().get(key).cloned()
    }

    /// Insert or overwrite `key` under the exclusive lock
    pub fn set(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    /// Remove `key` under the exclusive lock (no-op if absent)
    pub fn delete(&self, key: &K) {
        self.entries.write().remove(key);
    }

    /// Visit entries under the shared lock until `visit` returns `false`
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let entries = self.entries.read();
        for (key, value) in entries.iter() {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for LockGuardedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SyncMap<K, V> for LockGuardedMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        LockGuardedMap::get(self, key)
    }

    fn set(&self, key: K, value: V) {
        LockGuardedMap::set(self, key, value)
    }

    fn delete(&self, key: &K) {
        LockGuardedMap::delete(self, key)
    }

    fn range<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        LockGuardedMap::range(self, visit)
    }

    fn len(&self) -> usize {
        LockGuardedMap::len(self)
    }
}
