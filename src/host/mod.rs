// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host resource sampling.
//!
//! Ratios are percentages rounded to two decimals. A failed read is reported
//! as an error so the reporter can omit that metric for the cycle.

mod system;

use thiserror::Error;

pub use system::SystemSampler;

/// Errors reading host resource usage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("load average unavailable: {0}")]
    LoadAverage(f64),
    #[error("no logical cores reported")]
    NoCores,
    #[error("total memory reported as zero")]
    NoMemory,
}

/// Source of instantaneous host usage ratios.
pub trait HostSampler: Send + Sync {
    /// One-minute load average over logical core count, as a percentage.
    fn cpu_ratio(&self) -> Result<f64, SampleError>;

    /// `(total - free) / total * 100`.
    fn memory_ratio(&self) -> Result<f64, SampleError>;
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the CPU ratio from raw readings.
pub fn cpu_ratio_from(load_one: f64, cores: usize) -> Result<f64, SampleError> {
    if !load_one.is_finite() || load_one < 0.0 {
        return Err(SampleError::LoadAverage(load_one));
    }
    if cores == 0 {
        return Err(SampleError::NoCores);
    }
    Ok(round2(load_one / cores as f64 * 100.0))
}

/// Compute the memory ratio from raw byte counts.
pub fn memory_ratio_from(total: u64, free: u64) -> Result<f64, SampleError> {
    if total == 0 {
        return Err(SampleError::NoMemory);
    }
    let used = total.saturating_sub(free);
    Ok(round2(used as f64 / total as f64 * 100.0))
}
