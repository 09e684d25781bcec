//! Semaphore-guarded map
//!
//! HashMap serialized through a capacity-1 crossbeam channel.
//!
//! ## Protocol
//! The channel's single slot holds the table itself.
//! - Acquire: receive the table out of the channel, blocking while it is empty
//! - Release: send the table back in, unblocking the next receiver
//!
//! The send→recv pair orders each holder's writes before the next holder's
//! reads. Waiters are not guaranteed FIFO. Release happens in
//! `Permit::drop`, so it runs on every exit path including unwinding out of
//! a visitor.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use crossbeam::channel::{bounded, Receiver, Sender};

use super::SyncMap;

/// Binary semaphore built from a single-slot channel carrying the guarded value
struct Semaphore<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Semaphore<T> {
    fn new(value: T) -> Self {
        let (tx, rx) = bounded(1);
        tx.send(value)
            .expect("fresh channel has room for the guarded value");
        Self { tx, rx }
    }

    /// Block until the single permit is ours
    fn acquire(&self) -> Permit<'_, T> {
        let value = self
            .rx
            .recv()
            .expect("permit channel disconnected while semaphore is alive");
        Permit {
            value: Some(value),
            tx: &self.tx,
        }
    }
}

/// Proof of holding the permit; hands the value back on drop
struct Permit<'a, T> {
    /// Always `Some` until `drop`
    value: Option<T>,
    tx: &'a Sender<T>,
}

impl<T> Deref for Permit<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("permit value taken before drop")
    }
}

impl<T> DerefMut for Permit<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("permit value taken before drop")
    }
}

impl<T> Drop for Permit<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            // The slot is empty while we hold the value, so this never blocks.
            let _ = self.tx.send(value);
        }
    }
}

/// Hash map where every operation, reads included, holds one exclusive permit
///
/// ## Concurrency:
/// - Exactly one accessor (reader or writer) at a time
/// - No read/read parallelism
/// - `range` holds the permit for the whole iteration and sees a fully
///   quiesced table
pub struct SemaphoreGuardedMap<K, V> {
    entries: Semaphore<HashMap<K, V>>,
}

impl<K, V> SemaphoreGuardedMap<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        tracing::trace!(capacity, "creating semaphore-guarded map");
        Self {
            entries: Semaphore::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Run `f` with exclusive access to the table
    fn with_entries<R>(&self, f: impl FnOnce(&mut HashMap<K, V>) -> R) -> R {
        let mut entries = self.entries.acquire();
        f(&mut *entries)
    }

    /// Look up `key` while holding the permit
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    /// Insert or overwrite `key` while holding the permit
    pub fn set(&self, key: K, value: V) {
        self.with_entries(|entries| {
            entries.insert(key, value);
        })
    }

    /// Remove `key` while holding the permit (no-op if absent)
    pub fn delete(&self, key: &K) {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }

    /// Visit entries while holding the permit until `visit` returns `false`
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.with_entries(|entries| {
            for (key, value) in entries.iter() {
                if !visit(key, value) {
                    break;
                }
            }
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for SemaphoreGuardedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SyncMap<K, V> for SemaphoreGuardedMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        SemaphoreGuardedMap::get(self, key)
    }

    fn set(&self, key: K, value: V) {
        SemaphoreGuardedMap::set(self, key, value)
    }

    fn delete(&self, key: &K) {
        SemaphoreGuardedMap::delete(self, key)
    }

    fn range<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        SemaphoreGuardedMap::range(self, visit)
    }

    fn len(&self) -> usize {
        SemaphoreGuardedMap::len(self)
    }
}
