use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single key/value label attached to a metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    // ---
    pub key: String,
    pub value: String,
}

impl Tag {
    // ---
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        // ---
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Identity of a time series.
///
/// Intrinsic tags define the identity; meta tags travel along with the
/// metric but never change which series it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric {
    // ---
    pub intrinsic_tags: Vec<Tag>,
    pub meta_tags: Vec<Tag>,
}

impl Metric {
    // ---
    pub fn new(intrinsic_tags: Vec<Tag>) -> Self {
        // ---
        Self {
            intrinsic_tags,
            meta_tags: Vec::new(),
        }
    }

    pub fn with_meta_tag(mut self, tag: Tag) -> Self {
        // ---
        self.meta_tags.push(tag);
        self
    }

    /// Stable identity string built from the sorted intrinsic tags.
    pub fn key(&self) -> String {
        // ---
        let mut tags: Vec<&Tag> = self.intrinsic_tags.iter().collect();
        tags.sort();
        tags.iter()
            .map(|t| format!("{}={}", t.key, t.value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One timestamped measurement belonging to a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    // ---
    pub metric: Metric,
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    // ---
    pub fn new(metric: Metric, time: DateTime<Utc>, value: f64) -> Self {
        // ---
        Self {
            metric,
            time,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatcherKind {
    Equals,
    NotEquals,
    EqualsRegex,
    NotEqualsRegex,
}

/// Predicate selecting metrics by one of their tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatcher {
    // ---
    pub kind: MatcherKind,
    pub key: String,
    pub value: String,
}

impl TagMatcher {
    // ---
    pub fn new(kind: MatcherKind, key: impl Into<String>, value: impl Into<String>) -> Self {
        // ---
        Self {
            kind,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        // ---
        Self::new(MatcherKind::Equals, key, value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    None,
    Average,
    Min,
    Max,
}

/// Describes a range query over a single series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesFetchRequest {
    // ---
    pub metric: Metric,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
    pub aggregation: Aggregation,
}
