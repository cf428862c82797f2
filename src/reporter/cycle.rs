// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sampling and encoding stages of one reporter cycle.

use tracing::debug;

use crate::host::HostSampler;
use crate::line::{EncodeError, LineEncoder, MetricBatch, MetricValue, Tags};
use crate::registry::{LatencySummary, LatencyWindows, MetricsRegistry, RegistrySnapshot};

/// Everything read during the sampling stage.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct CycleInputs {
    pub snapshot: RegistrySnapshot,
    pub latencies: LatencyWindows,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
}

pub(super) fn sample(registry: &MetricsRegistry, sampler: &dyn HostSampler) -> CycleInputs {
    let cpu = sampler
        .cpu_ratio()
        .map_err(|e| debug!(error = %e, "cpu sample unavailable, omitting"))
        .ok();
    let memory = sampler
        .memory_ratio()
        .map_err(|e| debug!(error = %e, "memory sample unavailable, omitting"))
        .ok();

    CycleInputs {
        snapshot: registry.snapshot(),
        latencies: registry.take_latencies(),
        cpu,
        memory,
    }
}

fn tag(key: &str, value: &str) -> Tags {
    Tags::new().with(key, value)
}

pub(super) fn encode(inputs: &CycleInputs, encoder: &LineEncoder) -> Result<MetricBatch, EncodeError> {
    let mut batch = MetricBatch::new(encoder.clone());
    let s = &inputs.snapshot;
    let none = Tags::new();

    batch
        .add_metric("request", "total", s.total_requests(), &tag("method", "all"))?
        .add_metric("request", "total", s.get_count, &tag("method", "GET"))?
        .add_metric("request", "total", s.post_count, &tag("method", "POST"))?
        .add_metric("request", "total", s.delete_count, &tag("method", "DELETE"))?
        .add_metric("request", "total", s.put_count, &tag("method", "PUT"))?;

    if let Some(cpu) = inputs.cpu {
        batch.add_metric("system", "usage", cpu, &tag("type", "cpu"))?;
    }
    if let Some(memory) = inputs.memory {
        batch.add_metric("system", "usage", memory, &tag("type", "memory"))?;
    }

    batch.add_metric("user", "active", s.active_users, &none)?;

    batch
        .add_metric("purchase", "total", s.purchase_count, &tag("status", "sold"))?
        .add_metric("purchase", "total", s.failed_creations, &tag("status", "failed"))?
        .add_metric("purchase", "revenue", s.total_revenue, &none)?;

    batch
        .add_metric("auth", "total", s.auth_success, &tag("status", "success"))?
        .add_metric("auth", "total", s.auth_failure, &tag("status", "failure"))?;

    add_latency(&mut batch, "service_latency", &inputs.latencies.service)?;
    add_latency(&mut batch, "creation_latency", &inputs.latencies.creation)?;

    Ok(batch)
}

fn add_latency(
    batch: &mut MetricBatch,
    series: &str,
    summary: &LatencySummary,
) -> Result<(), EncodeError> {
    if let Some(mean) = summary.mean_ms() {
        batch.add_metric(series, "latency", MetricValue::Float(crate::host::round2(mean)), &Tags::new())?;
    }
    Ok(())
}
