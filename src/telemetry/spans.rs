// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Span helpers for reporter cycles.

use std::fmt::Display;

use tracing::{field, info_span, Span};

/// Records a cycle's outcome on its span.
pub trait SpanExt {
    /// `status` becomes `ok` or `error`; an error also fills `error.message`.
    fn record_result<T, E: Display>(&self, result: &Result<T, E>);

    fn record_lines(&self, lines: usize);
}

impl SpanExt for Span {
    fn record_result<T, E: Display>(&self, result: &Result<T, E>) {
        let Err(e) = result else {
            self.record("status", "ok");
            return;
        };
        self.record("status", "error");
        self.record("error.message", field::display(e));
    }

    fn record_lines(&self, lines: usize) {
        self.record("lines", lines as u64);
    }
}

/// Factory for the span wrapping one reporter cycle.
pub struct CycleSpan;

impl CycleSpan {
    /// `lines` and `status` are filled in once the batch is built.
    pub fn new(cycle: u64) -> Span {
        info_span!(
            "metrics_cycle",
            cycle,
            lines = field::Empty,
            status = field::Empty,
            error.message = field::Empty,
        )
    }
}
