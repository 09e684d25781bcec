//! # SyncMap
//!
//! Generic thread-safe key-value maps with two interchangeable guards:
//! - [`LockGuardedMap`]: reader-writer lock, concurrent reads
//! - [`SemaphoreGuardedMap`]: single-permit channel, one accessor at a time
//!
//! Both implement [`SyncMap`], so callers and the conformance [`harness`]
//! can swap them freely.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Callers / harness / syncmap-stress              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  SyncMap: get / set / delete / range
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │   RwLock    │          │ bounded(1) chan │
//!   │ (N readers) │          │  (one holder)   │
//!   └──────┬──────┘          └────────┬────────┘
//!          ▼                          ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │  HashMap    │          │    HashMap      │
//!   └─────────────┘          └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use syncmap::{LockGuardedMap, SemaphoreGuardedMap};
//!
//! let map = LockGuardedMap::new();
//! map.set(1, 1);
//! assert_eq!(map.get(&1), Some(1));
//! map.delete(&1);
//! assert_eq!(map.get(&1), None);
//!
//! let map = SemaphoreGuardedMap::new();
//! map.set("a", 1);
//! map.set("b", 2);
//! let mut seen = 0;
//! map.range(|_, _| {
//!     seen += 1;
//!     false
//! });
//! assert_eq!(seen, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod map;
pub mod harness;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SyncMapError};
pub use config::StressConfig;
pub use map::{LockGuardedMap, SemaphoreGuardedMap, SyncMap};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SyncMap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
