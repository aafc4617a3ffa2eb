use super::error::StorageError;
use super::models::{Metric, Sample, TagMatcher, TimeSeriesFetchRequest};
use std::sync::Arc;

/// Abstraction for time-series persistence.
///
/// Every payload is an `Option` because the host pipeline may forward a
/// missing payload; backends reject `None` with [`StorageError::NullInput`].
#[async_trait::async_trait]
pub trait TimeSeriesStorage: Send + Sync {
    // ---
    /// Persist a batch of samples.
    async fn store(&self, samples: Option<Vec<Sample>>) -> Result<(), StorageError>;

    /// Find every metric matching all of the given tag matchers.
    ///
    /// At least one matcher is required.
    async fn find_metrics(
        &self,
        matchers: Option<&[TagMatcher]>,
    ) -> Result<Vec<Metric>, StorageError>;

    /// Fetch the samples of one series over a time range.
    async fn get_timeseries(
        &self,
        request: Option<&TimeSeriesFetchRequest>,
    ) -> Result<Vec<Sample>, StorageError>;

    /// Delete a metric and all of its samples.
    async fn delete(&self, metric: Option<&Metric>) -> Result<(), StorageError>;
}

/// Type alias for any backend that implements TimeSeriesStorage.
pub type StoragePtr = Arc<dyn TimeSeriesStorage>;
