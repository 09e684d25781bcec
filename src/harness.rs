//! Conformance Harness
//!
//! Drives any [`SyncMap<usize, usize>`] through the shared contract.
//!
//! ## Scenarios
//! - `check_basic`: single-threaded set/get/delete, overwrite and early stop
//! - `run_stress`: W writers and W readers over disjoint key ranges, then a
//!   full scan that must find exactly `W * ops` entries with `key == value`
//! - `run_stress_with_deadline`: `run_stress` that reports a stuck run
//!   instead of hanging

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, RecvTimeoutError};

use crate::config::StressConfig;
use crate::error::{Result, SyncMapError};
use crate::map::SyncMap;

/// Outcome of a successful stress run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressReport {
    /// Entries found by the final scan
    pub entries: usize,

    /// Reads that found their key already written
    pub reader_hits: usize,

    pub elapsed: Duration,
}

/// Single-threaded contract checks
///
/// The map must start empty; a populated map is rejected before any key is
/// touched. On success the map is left empty again.
pub fn check_basic<M>(map: &M) -> Result<()>
where
    M: SyncMap<usize, usize>,
{
    let existing = map.len();
    if existing > 0 {
        return Err(SyncMapError::Config(format!(
            "basic checks need an empty map, found {} entries",
            existing
        )));
    }

    if map.get(&42).is_some() {
        return Err(conformance("never-set key 42 is present"));
    }

    map.set(1, 1);
    match map.get(&1) {
        Some(1) => {}
        other => {
            return Err(conformance(format!(
                "get(1) after set(1, 1) returned {:?}",
                other
            )))
        }
    }

    map.delete(&1);
    if let Some(v) = map.get(&1) {
        return Err(conformance(format!("get(1) after delete(1) returned Some({})", v)));
    }

    // Deleting an absent key is a no-op
    map.delete(&1);

    map.set(2, 10);
    map.set(2, 20);
    match map.get(&2) {
        Some(20) => {}
        other => {
            return Err(conformance(format!(
                "get(2) after overwrite returned {:?}",
                other
            )))
        }
    }

    map.set(3, 3);
    let mut visits = 0;
    map.range(|_, _| {
        visits += 1;
        false
    });
    if visits != 1 {
        return Err(conformance(format!("early-stop range visited {} entries", visits)));
    }

    map.delete(&2);
    map.delete(&3);
    if !map.is_empty() {
        return Err(conformance(format!(
            "map holds {} entries after cleanup",
            map.len()
        )));
    }

    tracing::debug!("basic contract checks passed");
    Ok(())
}

/// Concurrent writers and readers over disjoint key ranges
///
/// The map should start empty; the final scan counts every entry.
pub fn run_stress<M>(map: &M, config: &StressConfig) -> Result<StressReport>
where
    M: SyncMap<usize, usize> + Sync,
{
    config.validate()?;

    let workers = config.workers;
    let ops = config.ops_per_worker;
    let mismatches = AtomicUsize::new(0);
    let hits = AtomicUsize::new(0);

    tracing::debug!(workers, ops, "starting stress run");
    let started = Instant::now();

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers * 2);

        for id in 0..workers {
            handles.push(scope.spawn(move || {
                for j in 0..ops {
                    let key = id * ops + j;
                    map.set(key, key);
                }
            }));
        }

        for id in 0..workers {
            let mismatches = &mismatches;
            let hits = &hits;
            handles.push(scope.spawn(move || {
                for j in 0..ops {
                    let key = id * ops + j;
                    if let Some(value) = map.get(&key) {
                        hits.fetch_add(1, Ordering::Relaxed);
                        if value != key {
                            mismatches.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            }));
        }

        // Join everything before reporting so no panicked thread is left
        // for `scope` to re-raise.
        let mut first_panic = None;
        for handle in handles {
            if let Err(panic) = handle.join() {
                first_panic.get_or_insert_with(|| panic_message(&*panic));
            }
        }
        match first_panic {
            Some(message) => Err(SyncMapError::WorkerPanicked(message)),
            None => Ok(()),
        }
    })?;

    let mismatches = mismatches.into_inner();
    if mismatches > 0 {
        return Err(conformance(format!(
            "readers saw {} values different from their key",
            mismatches
        )));
    }

    let mut entries = 0;
    let mut first_bad = None;
    map.range(|&key, &value| {
        if key != value && first_bad.is_none() {
            first_bad = Some((key, value));
        }
        entries += 1;
        true
    });

    if let Some((key, value)) = first_bad {
        return Err(conformance(format!("key {} != value {}", key, value)));
    }

    let expected = config.expected_entries();
    if entries != expected {
        return Err(conformance(format!(
            "expected {} entries, got {}",
            expected, entries
        )));
    }

    let report = StressReport {
        entries,
        reader_hits: hits.into_inner(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        entries = report.entries,
        reader_hits = report.reader_hits,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "stress run passed"
    );
    Ok(report)
}

/// `run_stress` on a helper thread, failing if it outlives `config.deadline`
///
/// A run that misses the deadline leaves its helper thread behind; the map
/// stays alive through the `Arc` until that thread finishes.
pub fn run_stress_with_deadline<M>(map: Arc<M>, config: &StressConfig) -> Result<StressReport>
where
    M: SyncMap<usize, usize> + Send + Sync + 'static,
{
    config.validate()?;

    let (tx, rx) = bounded(1);
    let run_config = config.clone();
    thread::spawn(move || {
        let _ = tx.send(run_stress(&*map, &run_config));
    });

    match rx.recv_timeout(config.deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            tracing::error!(deadline = ?config.deadline, "stress run missed its deadline");
            Err(SyncMapError::Deadline(config.deadline))
        }
        Err(RecvTimeoutError::Disconnected) => Err(SyncMapError::WorkerPanicked(
            "stress coordinator exited without a result".into(),
        )),
    }
}

fn conformance(message: impl Into<String>) -> SyncMapError {
    SyncMapError::Conformance(message.into())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
