// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Line encoder: one observation to one text line.
//!
//! Form: `series,source=<source>[,key="value"...] field=value`.
//!
//! Names (series, field, tag keys, source) escape `\`, `,`, `=` and space
//! with a backslash. Quoted tag values escape `\` and `"`. Line breaks anywhere are
//! written as `\n` so an encoded observation is always exactly one line.

use std::fmt::Write as _;

use thiserror::Error;

use super::value::{MetricValue, Observation, Tags};

/// Errors produced while encoding an observation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("empty series name")]
    EmptySeries,
    #[error("empty field name in series {0}")]
    EmptyField(String),
    #[error("empty tag key in series {0}")]
    EmptyTagKey(String),
    #[error("non-finite value for {series}.{field}")]
    NonFinite { series: String, field: String },
}

/// Encodes observations with a fixed `source` tag.
#[derive(Debug, Clone)]
pub struct LineEncoder {
    source: String,
}

impl LineEncoder {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn encode(&self, obs: &Observation) -> Result<String, EncodeError> {
        self.encode_parts(&obs.series, &obs.field, obs.value, &obs.tags)
    }

    /// Encode without building an [`Observation`] first.
    pub fn encode_parts(
        &self,
        series: &str,
        field: &str,
        value: MetricValue,
        tags: &Tags,
    ) -> Result<String, EncodeError> {
        if series.is_empty() {
            return Err(EncodeError::EmptySeries);
        }
        if field.is_empty() {
            return Err(EncodeError::EmptyField(series.to_string()));
        }
        if !value.is_finite() {
            return Err(EncodeError::NonFinite {
                series: series.to_string(),
                field: field.to_string(),
            });
        }

        let mut line = String::with_capacity(64);
        push_name(&mut line, series);
        line.push_str(",source=");
        push_name(&mut line, &self.source);

        for (key, val) in tags.iter() {
            if key.is_empty() {
                return Err(EncodeError::EmptyTagKey(series.to_string()));
            }
            line.push(',');
            push_name(&mut line, key);
            line.push_str("=\"");
            push_quoted(&mut line, val);
            line.push('"');
        }

        line.push(' ');
        push_name(&mut line, field);
        line.push('=');
        // Writing into a String cannot fail.
        let _ = write!(line, "{}", value);
        Ok(line)
    }
}

fn push_name(out: &mut String, name: &str) {
    for c in name.chars() {
        match c {
            '\\' | ',' | '=' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}

fn push_quoted(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}
