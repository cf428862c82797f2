// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metric line encoding and per-cycle batching.

mod batch;
mod encoder;
mod value;

pub use batch::MetricBatch;
pub use encoder::{EncodeError, LineEncoder};
pub use value::{MetricValue, Observation, Tags};
