//! Fuzz target for the metric line encoder.
//!
//! Arbitrary names and tag values must never panic and must always encode
//! to exactly one line.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pulse_core::line::{LineEncoder, MetricValue, Tags};

#[derive(Debug, Arbitrary)]
struct Input {
    source: String,
    series: String,
    field: String,
    value: f64,
    tags: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let encoder = LineEncoder::new(input.source);
    let tags: Tags = input.tags.into_iter().collect();
    if let Ok(line) = encoder.encode_parts(&input.series, &input.field, MetricValue::Float(input.value), &tags) {
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
    }
});
