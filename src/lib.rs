// src/lib.rs
use anyhow::Result;
use tokio::sync::watch;

// Public exports (visible outside this module)
pub mod bench;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod config;
mod infrastructure;

pub use config::*;

// Publicly expose the backend implementations and their factory functions
pub use infrastructure::create_noop_storage;
pub use infrastructure::noop::{LatencyRange, NoOpStorage, DEFAULT_SEED};

use domain::{MeterPtr, StoragePtr};

/// A backend chosen at startup, plus its write meter when it keeps one.
#[derive(Clone)]
pub struct StorageBackend {
    pub storage: StoragePtr,
    pub samples_written: Option<MeterPtr>,
}

/// Initialize the global `tracing` subscriber. Safe to call more than once.
pub fn init_tracing() {
    // ---
    tracing_subscriber::fmt::try_init().ok();
}

/// Build the storage backend selected by `config.kind`.
///
/// `interrupt` is handed to the backend so a host shutdown can cut
/// artificial delays short.
pub fn create_storage(
    config: &StorageConfig,
    interrupt: Option<watch::Receiver<bool>>,
) -> Result<StorageBackend> {
    // ---
    match config.kind {
        StorageKind::Noop => {
            let storage = create_noop_storage(&config.noop, interrupt)?;
            tracing::info!(backend = %storage, "Storage backend ready");
            Ok(StorageBackend {
                samples_written: Some(storage.metrics()),
                storage,
            })
        }
    }
}
