// src/infrastructure/noop/mod.rs
mod latency;
mod noop_storage;

pub use latency::{LatencyRange, DEFAULT_SEED};
pub use noop_storage::NoOpStorage;

use crate::config::NoOpConfig;
use std::sync::Arc;
use tokio::sync::watch;

/// Creates a new no-op storage backend.
///
/// Writes are counted and discarded, reads return nothing. Useful for
/// benchmarking the pipeline in front of a real backend.
///
/// # Errors
/// Fails when the configured latency bounds are invalid.
pub fn create(
    config: &NoOpConfig,
    interrupt: Option<watch::Receiver<bool>>,
) -> anyhow::Result<Arc<NoOpStorage>> {
    // ---
    let range = LatencyRange::new(config.latency_min_ms, config.latency_max_ms)?;
    let storage = NoOpStorage::new(range, config.seed);
    let storage = match interrupt {
        Some(rx) => storage.with_interrupt(rx),
        None => storage,
    };
    Ok(Arc::new(storage))
}
