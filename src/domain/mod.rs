mod error;
mod metrics;
mod models;
mod storage;

pub(crate) use error::require;

// Publicly expose the storage abstraction and its error type
pub use error::StorageError;
pub use storage::{StoragePtr, TimeSeriesStorage};

// Publicly expose the write meter
pub use metrics::{Meter, MeterPtr, MeterRates};

// Publicly expose the time-series value types
pub use models::{Aggregation, MatcherKind, Metric, Sample, Tag, TagMatcher, TimeSeriesFetchRequest};
