// Test helpers are intentionally partially used
#![allow(dead_code)]

use chrono::Utc;
use std::sync::Once;
use timeseries_noop::domain::{Metric, Sample, Tag};

static INIT: Once = Once::new();

// ============================================================================
// Test Setup
// ============================================================================

/// Initialize logging once; set `TEST_DEBUG` to see debug output.
pub fn setup_test_env() {
    // ---
    INIT.call_once(|| {
        if std::env::var("TEST_DEBUG").is_ok() {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var("NO_COLOR", "1");
        }
        timeseries_noop::init_tracing();
    });
}

pub fn metric(resource: &str) -> Metric {
    // ---
    Metric::new(vec![
        Tag::new("name", "ifHCInOctets"),
        Tag::new("resourceId", resource),
    ])
}

pub fn batch(resource: &str, n: usize) -> Vec<Sample> {
    // ---
    let now = Utc::now();
    (0..n)
        .map(|i| Sample::new(metric(resource), now, i as f64))
        .collect()
}
