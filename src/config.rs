// src/config.rs

//! Startup configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment runs the no-op
//! backend without latency. Values are read once, at startup.

use anyhow::{bail, Result};
use std::str::FromStr;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.trim().parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated configuration for the backend and the benchmark driver.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: storage::StorageConfig,
    pub bench: bench::BenchConfig,
}

impl AppConfig {
    /// Loads all configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if the storage type names an unknown backend.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            storage: storage::StorageConfig::from_env()?,
            bench: bench::BenchConfig::from_env(),
        })
    }
}

// ============================================================
// Storage configuration
// ============================================================

mod storage {
    // ---
    use super::*;
    use crate::infrastructure::noop::DEFAULT_SEED;

    /// Which backend implementation to build.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StorageKind {
        Noop,
    }

    impl FromStr for StorageKind {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self> {
            // ---
            match s.trim().to_ascii_lowercase().as_str() {
                "noop" => Ok(StorageKind::Noop),
                other => bail!("Unknown storage type: {other}"),
            }
        }
    }

    /// Settings for the no-op backend.
    ///
    /// Bounds stay signed so that negative values reach validation and are
    /// rejected there instead of silently falling back to the default.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NoOpConfig {
        /// Lower bound of the artificial write delay, in milliseconds. Defaults to 0.
        pub latency_min_ms: i64,

        /// Upper bound of the artificial write delay, in milliseconds. Defaults to 0.
        pub latency_max_ms: i64,

        /// Seed for the delay generator. Defaults to 42.
        pub seed: u64,
    }

    impl Default for NoOpConfig {
        fn default() -> Self {
            Self {
                latency_min_ms: 0,
                latency_max_ms: 0,
                seed: DEFAULT_SEED,
            }
        }
    }

    impl NoOpConfig {
        pub fn from_env() -> Self {
            // ---
            Self {
                latency_min_ms: optional_env_parse!("TSS_NOOP_LATENCY_MIN_MS", i64, 0),
                latency_max_ms: optional_env_parse!("TSS_NOOP_LATENCY_MAX_MS", i64, 0),
                seed: optional_env_parse!("TSS_NOOP_SEED", u64, DEFAULT_SEED),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct StorageConfig {
        pub kind: StorageKind,
        pub noop: NoOpConfig,
    }

    impl StorageConfig {
        /// Builds a [`StorageConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `TSS_STORAGE_TYPE` names an unknown backend.
        pub fn from_env() -> Result<Self> {
            // ---
            let kind = std::env::var("TSS_STORAGE_TYPE")
                .unwrap_or_else(|_| "noop".to_string())
                .parse()?;

            Ok(Self {
                kind,
                noop: NoOpConfig::from_env(),
            })
        }
    }
}
pub use storage::{NoOpConfig, StorageConfig, StorageKind};

// ============================================================
// Benchmark driver configuration
// ============================================================

mod bench {
    // ---

    /// Shape of the synthetic write load.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BenchConfig {
        /// Concurrent writer tasks. Defaults to 4.
        pub writers: usize,

        /// Batches each writer sends. Defaults to 100.
        pub batches_per_writer: usize,

        /// Samples per batch. Defaults to 1000.
        pub batch_size: usize,
    }

    impl Default for BenchConfig {
        fn default() -> Self {
            Self {
                writers: 4,
                batches_per_writer: 100,
                batch_size: 1000,
            }
        }
    }

    impl BenchConfig {
        pub fn from_env() -> Self {
            // ---
            Self {
                writers: optional_env_parse!("TSS_BENCH_WRITERS", usize, 4),
                batches_per_writer: optional_env_parse!("TSS_BENCH_BATCHES", usize, 100),
                batch_size: optional_env_parse!("TSS_BENCH_BATCH_SIZE", usize, 1000),
            }
        }
    }
}
pub use bench::BenchConfig;

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "TSS_STORAGE_TYPE",
        "TSS_NOOP_LATENCY_MIN_MS",
        "TSS_NOOP_LATENCY_MAX_MS",
        "TSS_NOOP_SEED",
        "TSS_BENCH_WRITERS",
        "TSS_BENCH_BATCHES",
        "TSS_BENCH_BATCH_SIZE",
    ];

    fn clear_env() {
        // ---
        for key in VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_applied() -> Result<()> {
        // ---
        clear_env();

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.storage.kind, StorageKind::Noop);
        assert_eq!(cfg.storage.noop, NoOpConfig::default());
        assert_eq!(cfg.storage.noop.seed, 42);
        assert_eq!(cfg.bench, BenchConfig::default());

        Ok(())
    }

    #[test]
    #[serial]
    fn overrides_defaults() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("TSS_STORAGE_TYPE", "NOOP");
        std::env::set_var("TSS_NOOP_LATENCY_MIN_MS", "5");
        std::env::set_var("TSS_NOOP_LATENCY_MAX_MS", "15");
        std::env::set_var("TSS_NOOP_SEED", "7");
        std::env::set_var("TSS_BENCH_WRITERS", "16");
        std::env::set_var("TSS_BENCH_BATCHES", "3");
        std::env::set_var("TSS_BENCH_BATCH_SIZE", "250");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.storage.noop.latency_min_ms, 5);
        assert_eq!(cfg.storage.noop.latency_max_ms, 15);
        assert_eq!(cfg.storage.noop.seed, 7);
        assert_eq!(cfg.bench.writers, 16);
        assert_eq!(cfg.bench.batches_per_writer, 3);
        assert_eq!(cfg.bench.batch_size, 250);

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn negative_latency_is_kept_for_validation() {
        // ---
        clear_env();
        std::env::set_var("TSS_NOOP_LATENCY_MIN_MS", "-3");

        let cfg = NoOpConfig::from_env();
        assert_eq!(cfg.latency_min_ms, -3);

        clear_env();
    }

    #[test]
    #[serial]
    fn unparsable_values_fall_back() {
        // ---
        clear_env();
        std::env::set_var("TSS_BENCH_WRITERS", "many");

        assert_eq!(BenchConfig::from_env().writers, 4);

        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_storage_type_fails() {
        // ---
        clear_env();
        std::env::set_var("TSS_STORAGE_TYPE", "cassandra");

        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Unknown storage type: cassandra"), "{err}");

        clear_env();
    }
}
