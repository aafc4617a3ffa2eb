use crate::domain::StorageError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Seed used when the caller does not pick one, so benchmark runs repeat.
pub const DEFAULT_SEED: u64 = 42;

/// Inclusive bounds, in milliseconds, for the artificial write delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyRange {
    min: u64,
    max: u64,
}

impl LatencyRange {
    // ---
    /// Validates and builds a range.
    ///
    /// # Errors
    /// `InvalidArgument` when either bound is negative or `min > max`.
    pub fn new(min: i64, max: i64) -> Result<Self, StorageError> {
        // ---
        if min < 0 {
            return Err(StorageError::invalid("latency min cannot be smaller than 0"));
        }
        if max < 0 {
            return Err(StorageError::invalid("latency max cannot be smaller than 0"));
        }
        if min > max {
            return Err(StorageError::invalid(
                "latency min cannot be bigger than latency max",
            ));
        }
        Ok(Self {
            min: min.unsigned_abs(),
            max: max.unsigned_abs(),
        })
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max)
    }

    pub fn is_zero(&self) -> bool {
        self.max == 0
    }
}

/// Draws per-call delays from a seeded generator.
///
/// The generator lock is held only for the draw itself.
#[derive(Debug)]
pub struct LatencyGenerator {
    range: LatencyRange,
    rng: Mutex<StdRng>,
}

impl LatencyGenerator {
    // ---
    pub fn new(range: LatencyRange, seed: u64) -> Self {
        // ---
        Self {
            range,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn range(&self) -> LatencyRange {
        self.range
    }

    /// Next delay: the constant when both bounds agree, otherwise uniform
    /// over `[min, max]`.
    pub fn next_delay(&self) -> Duration {
        // ---
        if self.range.min == self.range.max {
            return Duration::from_millis(self.range.min);
        }

        // StdRng state is valid after any panic, so a poisoned lock is reused.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Duration::from_millis(rng.gen_range(self.range.min..=self.range.max))
    }
}
