//! Map Module
//!
//! Thread-safe hash maps sharing one contract.
//!
//! ## Variants
//! - [`LockGuardedMap`]: `parking_lot::RwLock`, many readers or one writer
//! - [`SemaphoreGuardedMap`]: single-permit channel, exactly one accessor
//!
//! ## Guarantees (both variants)
//! - No operation fails; contention only blocks the caller
//! - Mutations are linearizable per instance
//! - `range` holds the guard for the whole iteration
//! - The guard is released on every exit path, including a panicking visitor
//!
//! Calling back into the same map from inside a `range` visitor deadlocks
//! the semaphore variant and can deadlock the lock variant behind a queued
//! writer. Collect what you need and act after `range` returns.

mod lock;
mod semaphore;

pub use lock::LockGuardedMap;
pub use semaphore::SemaphoreGuardedMap;

/// Capability contract shared by both map variants
pub trait SyncMap<K, V> {
    /// Clone out the value for `key`, or `None` if absent
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or overwrite `key`
    fn set(&self, key: K, value: V);

    /// Remove `key` if present
    fn delete(&self, key: &K);

    /// Visit every entry in unspecified order until `visit` returns `false`
    fn range<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool;

    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
