//! SyncMap Stress Binary
//!
//! Runs the conformance harness against one or both map variants.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use syncmap::harness::{check_basic, run_stress_with_deadline};
use syncmap::{LockGuardedMap, SemaphoreGuardedMap, StressConfig, SyncMap};
use tracing_subscriber::{fmt, EnvFilter};

/// Which map implementation to exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    Lock,
    Semaphore,
    Both,
}

/// SyncMap stress runner
#[derive(Parser, Debug)]
#[command(name = "syncmap-stress")]
#[command(about = "Concurrent conformance runs for the SyncMap variants")]
#[command(version)]
struct Args {
    /// Map variant to run
    #[arg(short, long, value_enum, default_value = "both")]
    variant: Variant,

    /// Writer threads (the same number of readers is spawned)
    #[arg(short, long, default_value = "10")]
    workers: usize,

    /// Keys per worker
    #[arg(short, long, default_value = "1000")]
    ops: usize,

    /// Seconds before a run is reported as stuck
    #[arg(short, long, default_value = "30")]
    deadline_secs: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,syncmap=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SyncMap stress v{}", syncmap::VERSION);

    let config = StressConfig::builder()
        .workers(args.workers)
        .ops_per_worker(args.ops)
        .deadline(Duration::from_secs(args.deadline_secs))
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut failed = false;
    if matches!(args.variant, Variant::Lock | Variant::Both) {
        failed |= !exercise("lock", LockGuardedMap::<usize, usize>::new, &config);
    }
    if matches!(args.variant, Variant::Semaphore | Variant::Both) {
        failed |= !exercise("semaphore", SemaphoreGuardedMap::<usize, usize>::new, &config);
    }

    if failed {
        std::process::exit(1);
    }
}

/// Basic checks on one instance, stress on a fresh one; true on success
fn exercise<M, F>(name: &str, create: F, config: &StressConfig) -> bool
where
    M: SyncMap<usize, usize> + Send + Sync + 'static,
    F: Fn() -> M,
{
    tracing::info!(variant = name, "running basic checks");
    if let Err(e) = check_basic(&create()) {
        tracing::error!(variant = name, "Basic checks failed: {}", e);
        return false;
    }

    tracing::info!(
        variant = name,
        workers = config.workers,
        ops = config.ops_per_worker,
        "running stress"
    );
    match run_stress_with_deadline(Arc::new(create()), config) {
        Ok(report) => {
            println!(
                "{:<10} entries={} reader_hits={} elapsed={:?}",
                name, report.entries, report.reader_hits, report.elapsed
            );
            true
        }
        Err(e) => {
            tracing::error!(variant = name, "Stress run failed: {}", e);
            false
        }
    }
}
