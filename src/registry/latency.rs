// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-cycle latency windows.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary statistics for one drained window, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub count: u64,
    pub sum_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    /// Mean latency, or `None` for an empty window.
    pub fn mean_ms(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum_ms / self.count as f64)
        }
    }
}

/// Both windows drained in one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyWindows {
    pub service: LatencySummary,
    pub creation: LatencySummary,
}

/// Accumulator for observations since the last drain.
#[derive(Debug)]
pub(super) struct LatencyWindow {
    count: u64,
    sum_ms: f64,
    min_ms: f64,
    max_ms: f64,
}

impl LatencyWindow {
    pub(super) fn new() -> Self {
        Self {
            count: 0,
            sum_ms: 0.0,
            min_ms: f64::MAX,
            max_ms: f64::MIN,
        }
    }

    pub(super) fn record(&mut self, elapsed: Duration) {
        let ms = elapsed.as_nanos() as f64 / 1_000_000.0;
        self.count += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    /// Return the summary and start a fresh window.
    pub(super) fn take(&mut self) -> LatencySummary {
        let window = std::mem::replace(self, Self::new());
        window.to_summary()
    }

    fn to_summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.count,
            sum_ms: self.sum_ms,
            min_ms: if self.count == 0 { 0.0 } else { self.min_ms },
            max_ms: if self.count == 0 { 0.0 } else { self.max_ms },
        }
    }
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new()
    }
}
