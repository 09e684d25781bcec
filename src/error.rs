//! Error types for SyncMap
//!
//! The maps themselves never fail. These errors come from the code around
//! them: stress configuration, the conformance harness and the CLI.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using SyncMapError
pub type Result<T> = std::result::Result<T, SyncMapError>;

/// Unified error type for SyncMap harness operations
#[derive(Debug, Error)]
pub enum SyncMapError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Harness Errors
    // -------------------------------------------------------------------------
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Conformance violation: {0}")]
    Conformance(String),

    #[error("Stress run did not finish within {0:?}")]
    Deadline(Duration),
}
