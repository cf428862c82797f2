// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Counter/gauge registry shared by request handlers and the reporter.
//!
//! Every hook takes the registry lock for a single arithmetic update and
//! returns nothing, so instrumentation can never fail a caller's request.
//! Values are also forwarded to the `metrics` facade; with no recorder
//! installed that forwarding is a no-op.

mod latency;
mod state;

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;

pub use latency::{LatencySummary, LatencyWindows};
pub use state::RegistrySnapshot;

use latency::LatencyWindow;
use state::RegistryState;

#[derive(Debug, Default)]
struct Windows {
    service: LatencyWindow,
    creation: LatencyWindow,
}

/// Process-lifetime aggregate metrics.
///
/// Construct once at startup and share behind an `Arc`.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    state: Mutex<RegistryState>,
    windows: Mutex<Windows>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one inbound request. Only GET, POST, DELETE and PUT are tracked.
    pub fn record_request(&self, method: &str) {
        let tracked = self.state.lock().request(method);
        if tracked {
            // Label values must be 'static; re-match instead of borrowing `method`.
            let label: &'static str = match method {
                "GET" => "GET",
                "POST" => "POST",
                "DELETE" => "DELETE",
                _ => "PUT",
            };
            metrics::counter!("pulse_requests_total", "method" => label).increment(1);
        }
    }

    pub fn user_connected(&self) {
        let active = self.state.lock().user_connected();
        metrics::gauge!("pulse_active_users").set(active as f64);
    }

    /// Saturates at zero.
    pub fn user_disconnected(&self) {
        let active = self.state.lock().user_disconnected();
        metrics::gauge!("pulse_active_users").set(active as f64);
    }

    pub fn record_auth_outcome(&self, success: bool) {
        self.state.lock().auth(success);
        let status = if success { "success" } else { "failure" };
        metrics::counter!("pulse_auth_total", "status" => status).increment(1);
    }

    /// Record a completed order.
    ///
    /// `item_count == 0` is ignored. Negative or non-finite revenue counts as
    /// zero while the items are still recorded.
    pub fn record_purchase(&self, item_count: u64, revenue: f64) {
        if item_count == 0 {
            return;
        }
        let revenue = if revenue.is_finite() && revenue > 0.0 {
            revenue
        } else {
            if revenue != 0.0 {
                tracing::debug!(revenue, "ignoring invalid purchase revenue");
            }
            0.0
        };
        self.state.lock().purchase(item_count, revenue);
        metrics::counter!("pulse_purchases_total", "status" => "sold").increment(item_count);
        metrics::gauge!("pulse_revenue_total").increment(revenue);
    }

    pub fn record_creation_failure(&self) {
        self.state.lock().creation_failure();
        metrics::counter!("pulse_purchases_total", "status" => "failed").increment(1);
    }

    pub fn record_service_latency(&self, elapsed: Duration) {
        self.windows.lock().service.record(elapsed);
        metrics::histogram!("pulse_service_latency_ms").record(elapsed.as_secs_f64() * 1000.0);
    }

    pub fn record_creation_latency(&self, elapsed: Duration) {
        self.windows.lock().creation.record(elapsed);
        metrics::histogram!("pulse_creation_latency_ms").record(elapsed.as_secs_f64() * 1000.0);
    }

    /// Await `fut` and record how long it took as a creation latency.
    pub async fn time_creation<F: Future>(&self, fut: F) -> F::Output {
        let start = tokio::time::Instant::now();
        let out = fut.await;
        self.record_creation_latency(start.elapsed());
        out
    }

    /// Consistent copy of all counters and gauges.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.state.lock().counts
    }

    /// Drain both latency windows. Intended for the single reporter.
    pub fn take_latencies(&self) -> LatencyWindows {
        let mut windows = self.windows.lock();
        LatencyWindows {
            service: windows.service.take(),
            creation: windows.creation.take(),
        }
    }
}
