use metrics::counter;

/// Bump the global samples-written counter on the `metrics` facade.
///
/// Without an installed recorder this is a no-op.
pub fn increment_samples_written(n: u64) {
    counter!("samples_written_total").increment(n);
}
