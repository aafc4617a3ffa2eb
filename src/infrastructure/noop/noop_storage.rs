//! Storage backend that accepts every write and keeps nothing.
//!
//! Writes are counted on a [`Meter`] and optionally delayed by a seeded,
//! reproducible latency so a benchmark can model a slower backend. Reads
//! always come back empty.
//!
//! # Interrupted delays
//!
//! A host may hand in a shutdown signal. When it fires while a write is
//! sleeping, the sleep ends early and the write is still counted. The
//! interruption is not reported to the caller.

use super::latency::{LatencyGenerator, LatencyRange, DEFAULT_SEED};
use crate::domain::{
    require, Meter, MeterPtr, Metric, Sample, StorageError, TagMatcher, TimeSeriesFetchRequest,
    TimeSeriesStorage,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Rejects but counts all written samples.
#[derive(Debug)]
pub struct NoOpStorage {
    latency: LatencyGenerator,
    samples_written: MeterPtr,
    interrupt: Option<watch::Receiver<bool>>,
}

impl NoOpStorage {
    // ---
    pub fn new(latency: LatencyRange, seed: u64) -> Self {
        // ---
        tracing::info!(
            min_ms = latency.min().as_millis() as u64,
            max_ms = latency.max().as_millis() as u64,
            seed,
            "Creating no-op time-series storage"
        );
        NoOpStorage {
            latency: LatencyGenerator::new(latency, seed),
            samples_written: Arc::new(Meter::new()),
            interrupt: None,
        }
    }

    /// Validates the bounds (milliseconds) and uses [`DEFAULT_SEED`].
    ///
    /// # Errors
    /// `InvalidArgument` for negative bounds or `min > max`.
    pub fn with_latency(min: i64, max: i64) -> Result<Self, StorageError> {
        // ---
        Ok(Self::new(LatencyRange::new(min, max)?, DEFAULT_SEED))
    }

    /// Ends pending and future delays once the signal reads `true`.
    pub fn with_interrupt(mut self, interrupt: watch::Receiver<bool>) -> Self {
        // ---
        self.interrupt = Some(interrupt);
        self
    }

    /// Handle to the samples-written meter.
    pub fn metrics(&self) -> MeterPtr {
        // ---
        Arc::clone(&self.samples_written)
    }

    pub fn latency(&self) -> LatencyRange {
        self.latency.range()
    }

    async fn add_latency(&self) {
        // ---
        let delay = self.latency.next_delay();
        if delay.is_zero() {
            return;
        }

        match self.interrupt.clone() {
            None => tokio::time::sleep(delay).await,
            Some(interrupt) => {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = interrupted(interrupt) => {
                        tracing::debug!(?delay, "Artificial latency interrupted");
                    }
                }
            }
        }
    }
}

/// Resolves once the signal reads `true`; never resolves if the sender is gone.
async fn interrupted(mut interrupt: watch::Receiver<bool>) {
    // ---
    let closed = interrupt.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new(LatencyRange::default(), DEFAULT_SEED)
    }
}

impl fmt::Display for NoOpStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoOpStorage")
    }
}

#[async_trait::async_trait]
impl TimeSeriesStorage for NoOpStorage {
    // ---
    async fn store(&self, samples: Option<Vec<Sample>>) -> Result<(), StorageError> {
        // ---
        let samples = require(samples, "samples")?;
        self.add_latency().await;

        let n = samples.len() as u64;
        self.samples_written.mark(n);
        crate::infrastructure::metrics::increment_samples_written(n);
        Ok(())
    }

    async fn find_metrics(
        &self,
        matchers: Option<&[TagMatcher]>,
    ) -> Result<Vec<Metric>, StorageError> {
        // ---
        let matchers = require(matchers, "tag_matchers")?;
        if matchers.is_empty() {
            return Err(StorageError::InvalidArgument(
                "at least one tag matcher is required".to_string(),
            ));
        }
        Ok(Vec::new())
    }

    async fn get_timeseries(
        &self,
        request: Option<&TimeSeriesFetchRequest>,
    ) -> Result<Vec<Sample>, StorageError> {
        // ---
        require(request, "request")?;
        Ok(Vec::new())
    }

    async fn delete(&self, metric: Option<&Metric>) -> Result<(), StorageError> {
        // ---
        require(metric, "metric")?;
        Ok(())
    }
}
