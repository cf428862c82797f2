// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed observation model consumed by the line encoder.

use std::fmt;

/// Numeric value carried by one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Counter-style integer.
    Int(u64),
    /// Ratio, revenue or latency. Must be finite to encode.
    Float(f64),
}

impl MetricValue {
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(v) => v.is_finite(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        Self::Int(u64::from(v))
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Ordered label set with unique keys.
///
/// Iteration follows insertion order. Inserting an existing key replaces the
/// value in place, keeping the key's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}

/// One metric observation: series, field, value and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub series: String,
    pub field: String,
    pub value: MetricValue,
    pub tags: Tags,
}

impl Observation {
    pub fn new(
        series: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<MetricValue>,
        tags: Tags,
    ) -> Self {
        Self {
            series: series.into(),
            field: field.into(),
            value: value.into(),
            tags,
        }
    }
}
