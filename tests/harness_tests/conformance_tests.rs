//! Conformance Tests
//!
//! Runs both map variants through the shared contract:
//! - Presence, round-trip, delete, overwrite, early stop
//! - Concurrent writers/readers with a final full scan
//! - Completion within a deadline
//! - Harness error reporting

use std::sync::Arc;
use std::time::Duration;

use syncmap::harness::{check_basic, run_stress, run_stress_with_deadline};
use syncmap::{LockGuardedMap, SemaphoreGuardedMap, StressConfig, SyncMap, SyncMapError};

// =============================================================================
// Helpers
// =============================================================================

/// Contract checks written once against the trait
fn assert_contract<M: SyncMap<usize, usize>>(map: &M) {
    for k in 0..16 {
        assert_eq!(map.get(&k), None);
    }

    map.set(7, 70);
    assert_eq!(map.get(&7), Some(70));

    map.set(7, 71);
    assert_eq!(map.get(&7), Some(71));

    map.delete(&7);
    assert_eq!(map.get(&7), None);
    map.delete(&7);
    assert_eq!(map.get(&7), None);

    map.set(1, 1);
    map.set(2, 2);
    assert_eq!(map.len(), 2);

    let mut calls = 0;
    map.range(|_, _| {
        calls += 1;
        false
    });
    assert_eq!(calls, 1);
}

fn small_config() -> StressConfig {
    StressConfig::builder()
        .workers(4)
        .ops_per_worker(250)
        .deadline(Duration::from_secs(30))
        .build()
}

/// Map that pretends to store but reports the wrong value on every read
struct LyingMap(LockGuardedMap<usize, usize>);

impl SyncMap<usize, usize> for LyingMap {
    fn get(&self, key: &usize) -> Option<usize> {
        self.0.get(key).map(|v| v + 1)
    }

    fn set(&self, key: usize, value: usize) {
        self.0.set(key, value)
    }

    fn delete(&self, key: &usize) {
        self.0.delete(key)
    }

    fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&usize, &usize) -> bool,
    {
        self.0.range(|k, v| visit(k, &(v + 1)))
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

// =============================================================================
// Basic Contract Tests
// =============================================================================

#[test]
fn test_lock_map_contract() {
    assert_contract(&LockGuardedMap::new());
}

#[test]
fn test_semaphore_map_contract() {
    assert_contract(&SemaphoreGuardedMap::new());
}

#[test]
fn test_check_basic_passes_for_both_variants() {
    check_basic(&LockGuardedMap::new()).unwrap();
    check_basic(&SemaphoreGuardedMap::new()).unwrap();
}

#[test]
fn test_check_basic_detects_broken_map() {
    let err = check_basic(&LyingMap(LockGuardedMap::new())).unwrap_err();
    assert!(matches!(err, SyncMapError::Conformance(_)));
}

#[test]
fn test_check_basic_rejects_populated_map() {
    let map = SemaphoreGuardedMap::new();
    map.set(1, 100);
    map.set(2, 200);

    let err = check_basic(&map).unwrap_err();

    assert!(matches!(err, SyncMapError::Config(_)));
    // Caller's entries are left alone
    assert_eq!(map.get(&1), Some(100));
    assert_eq!(map.get(&2), Some(200));
    assert_eq!(map.len(), 2);
}

// =============================================================================
// Stress Tests
// =============================================================================

#[test]
fn test_lock_map_stress() {
    let map = LockGuardedMap::new();
    let config = small_config();

    let report = run_stress(&map, &config).unwrap();

    assert_eq!(report.entries, 1000);
    assert!(report.reader_hits <= 1000);
    assert_eq!(map.len(), 1000);
}

#[test]
fn test_semaphore_map_stress() {
    let map = SemaphoreGuardedMap::new();
    let config = small_config();

    let report = run_stress(&map, &config).unwrap();

    assert_eq!(report.entries, 1000);
    assert_eq!(map.len(), 1000);
}

#[test]
fn test_full_stress_completes_within_deadline() {
    // 10 writers x 1000 ops interleaved with 10 readers x 1000 ops
    let config = StressConfig::builder()
        .deadline(Duration::from_secs(60))
        .build();

    let report = run_stress_with_deadline(Arc::new(LockGuardedMap::new()), &config).unwrap();
    assert_eq!(report.entries, 10 * 1000);

    let report = run_stress_with_deadline(Arc::new(SemaphoreGuardedMap::new()), &config).unwrap();
    assert_eq!(report.entries, 10 * 1000);
}

#[test]
fn test_stress_detects_wrong_values() {
    let map = LyingMap(LockGuardedMap::new());

    let err = run_stress(&map, &small_config()).unwrap_err();

    assert!(matches!(err, SyncMapError::Conformance(_)));
}

#[test]
fn test_stress_detects_leftover_entries() {
    let map = SemaphoreGuardedMap::new();
    map.set(usize::MAX, usize::MAX);

    let err = run_stress(&map, &small_config()).unwrap_err();

    match err {
        SyncMapError::Conformance(msg) => assert!(msg.contains("expected 1000 entries")),
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_default_config() {
    let config = StressConfig::default();
    assert_eq!(config.workers, 10);
    assert_eq!(config.ops_per_worker, 1000);
    assert_eq!(config.expected_entries(), 10_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_configs_are_rejected() {
    let zero_workers = StressConfig::builder().workers(0).build();
    assert!(matches!(zero_workers.validate(), Err(SyncMapError::Config(_))));

    let zero_ops = StressConfig::builder().ops_per_worker(0).build();
    assert!(matches!(zero_ops.validate(), Err(SyncMapError::Config(_))));

    let overflow = StressConfig::builder()
        .workers(usize::MAX)
        .ops_per_worker(2)
        .build();
    assert!(matches!(overflow.validate(), Err(SyncMapError::Config(_))));

    let no_deadline = StressConfig::builder().deadline(Duration::ZERO).build();
    assert!(matches!(no_deadline.validate(), Err(SyncMapError::Config(_))));
}

#[test]
fn test_stress_rejects_invalid_config() {
    let map = LockGuardedMap::new();
    let config = StressConfig::builder().workers(0).build();

    let err = run_stress(&map, &config).unwrap_err();

    assert!(matches!(err, SyncMapError::Config(_)));
    assert!(map.is_empty());
}
