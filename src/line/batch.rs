// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Append-only line collector for one reporting cycle.

use super::encoder::{EncodeError, LineEncoder};
use super::value::{MetricValue, Tags};

/// Ordered batch of encoded lines.
#[derive(Debug, Clone)]
pub struct MetricBatch {
    encoder: LineEncoder,
    lines: Vec<String>,
}

impl MetricBatch {
    pub fn new(encoder: LineEncoder) -> Self {
        Self {
            encoder,
            lines: Vec::new(),
        }
    }

    /// Encode one observation and append it.
    pub fn add_metric(
        &mut self,
        series: &str,
        field: &str,
        value: impl Into<MetricValue>,
        tags: &Tags,
    ) -> Result<&mut Self, EncodeError> {
        let line = self.encoder.encode_parts(series, field, value.into(), tags)?;
        self.lines.push(line);
        Ok(self)
    }

    /// Join all lines with `separator`. No trailing separator.
    pub fn render(&self, separator: &str) -> String {
        self.lines.join(separator)
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
