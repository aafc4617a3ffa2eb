//! Synthetic write load for a [`StoragePtr`].
//!
//! Spawns one task per writer; each sends fixed-size batches of generated
//! samples until it has sent its quota or the shutdown signal fires.

use crate::config::BenchConfig;
use crate::domain::{Metric, Sample, StoragePtr, Tag};
use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub writers: usize,
    pub batches: u64,
    pub samples: u64,
    pub elapsed: Duration,
}

impl BenchReport {
    /// Samples per second over the whole run.
    pub fn throughput(&self) -> f64 {
        // ---
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.samples as f64 / secs
    }
}

/// Drives `config.writers` concurrent writers against `storage`.
///
/// # Errors
/// Fails on the first rejected batch or writer panic. The remaining
/// writers are aborted when that happens.
pub async fn run(
    storage: StoragePtr,
    config: &BenchConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<BenchReport> {
    // ---
    tracing::info!(
        writers = config.writers,
        batches_per_writer = config.batches_per_writer,
        batch_size = config.batch_size,
        "Starting benchmark"
    );

    let start = Instant::now();
    let mut writers = JoinSet::new();
    for writer in 0..config.writers {
        writers.spawn(write_batches(
            StoragePtr::clone(&storage),
            writer,
            config.batches_per_writer,
            config.batch_size,
            shutdown.clone(),
        ));
    }

    let mut report = BenchReport {
        writers: config.writers,
        batches: 0,
        samples: 0,
        elapsed: Duration::ZERO,
    };
    // Returning early drops the set, which aborts every writer still running.
    while let Some(outcome) = writers.join_next().await {
        let (batches, samples) = outcome??;
        report.batches += batches;
        report.samples += samples;
    }
    report.elapsed = start.elapsed();

    tracing::info!(
        samples = report.samples,
        elapsed_ms = report.elapsed.as_millis() as u64,
        throughput = report.throughput(),
        "Benchmark finished"
    );
    Ok(report)
}

async fn write_batches(
    storage: StoragePtr,
    writer: usize,
    batches: usize,
    batch_size: usize,
    shutdown: watch::Receiver<bool>,
) -> Result<(u64, u64)> {
    // ---
    let mut rng = StdRng::seed_from_u64(10_000 + writer as u64);
    let metric = Metric::new(vec![
        Tag::new("name", "bench_metric"),
        Tag::new("resourceId", format!("writer-{writer}")),
    ]);

    let mut sent = (0u64, 0u64);
    for batch in 0..batches {
        if *shutdown.borrow() {
            tracing::debug!(writer, batch, "Shutdown requested, writer stopping");
            break;
        }

        let now = Utc::now();
        let samples: Vec<Sample> = (0..batch_size)
            .map(|_| Sample::new(metric.clone(), now, rng.gen::<f64>()))
            .collect();

        storage.store(Some(samples)).await?;
        sent.0 += 1;
        sent.1 += batch_size as u64;
    }
    Ok(sent)
}
