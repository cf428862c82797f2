// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tracing setup for hosts embedding Pulse-Core.
//!
//! Provides subscriber initialization and the per-cycle reporter span.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{CycleSpan, SpanExt};
