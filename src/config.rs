//! Configuration for the stress harness
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{Result, SyncMapError};

/// Shape of one concurrent stress run
#[derive(Debug, Clone)]
pub struct StressConfig {
    // -------------------------------------------------------------------------
    // Worker Configuration
    // -------------------------------------------------------------------------
    /// Number of writer threads. The same number of reader threads is spawned.
    pub workers: usize,

    /// Keys written (and read) by each worker.
    /// Worker `id` owns keys `id * ops_per_worker .. (id + 1) * ops_per_worker`.
    pub ops_per_worker: usize,

    // -------------------------------------------------------------------------
    // Deadline Configuration
    // -------------------------------------------------------------------------
    /// Upper bound on a whole run before it is reported as stuck
    pub deadline: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            ops_per_worker: 1000,
            deadline: Duration::from_secs(30),
        }
    }
}

impl StressConfig {
    /// Create a new config builder
    pub fn builder() -> StressConfigBuilder {
        StressConfigBuilder::default()
    }

    /// Number of entries a completed run must leave in the map
    pub fn expected_entries(&self) -> usize {
        self.workers * self.ops_per_worker
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SyncMapError::Config("workers must be at least 1".into()));
        }
        if self.ops_per_worker == 0 {
            return Err(SyncMapError::Config(
                "ops_per_worker must be at least 1".into(),
            ));
        }
        if self.workers.checked_mul(self.ops_per_worker).is_none() {
            return Err(SyncMapError::Config(format!(
                "key space {} x {} overflows usize",
                self.workers, self.ops_per_worker
            )));
        }
        if self.deadline.is_zero() {
            return Err(SyncMapError::Config("deadline must be non-zero".into()));
        }
        Ok(())
    }
}

/// Builder for StressConfig
#[derive(Default)]
pub struct StressConfigBuilder {
    config: StressConfig,
}

impl StressConfigBuilder {
    /// Set the number of writer (and reader) threads
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the number of keys each worker handles
    pub fn ops_per_worker(mut self, count: usize) -> Self {
        self.config.ops_per_worker = count;
        self
    }

    /// Set the run deadline
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = deadline;
        self
    }

    pub fn build(self) -> StressConfig {
        self.config
    }
}
