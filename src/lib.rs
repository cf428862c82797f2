// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse-Core
//!
//! In-process request, auth and business metrics for a request-serving
//! pipeline, pushed periodically to a time-series sink as text lines.
//!
//! # Design Principles
//!
//! - **Infallible hooks**: instrumentation never fails or blocks a request
//! - **Best effort**: one push per cycle, no retry, no buffering
//! - **Explicit ownership**: one registry built at startup, shared by `Arc`
//! - **Background only**: the reporter stops on a cancellation token and never
//!   holds the process open
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pulse_core::{config, Telemetry};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let shutdown = CancellationToken::new();
//! let telemetry = Telemetry::start(&config::load(), shutdown.clone())?;
//!
//! let metrics = telemetry.registry().clone();
//! metrics.record_request("GET");
//! metrics.record_auth_outcome(true);
//! metrics.record_purchase(2, 0.0042);
//!
//! telemetry.shutdown(Duration::from_secs(2)).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod host;
pub mod line;
pub mod registry;
pub mod reporter;
pub mod shutdown;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use config::MetricsConfig;
use host::SystemSampler;
use registry::MetricsRegistry;
use reporter::Reporter;
use shutdown::{ReporterHandle, ShutdownResult};
use transport::{HttpTransport, TransportError};

pub use line::{LineEncoder, MetricBatch, MetricValue, Observation, Tags};
pub use registry::RegistrySnapshot;

/// Running metrics subsystem: the shared registry plus its reporter loop.
pub struct Telemetry {
    registry: Arc<MetricsRegistry>,
    reporter: ReporterHandle,
}

impl Telemetry {
    /// Build the registry, HTTP transport and host sampler, then spawn the
    /// reporter. Must be called inside a tokio runtime.
    pub fn start(config: &MetricsConfig, shutdown: CancellationToken) -> Result<Self, TransportError> {
        for warning in config.validate() {
            tracing::warn!(%warning, "metrics configuration");
        }

        let registry = Arc::new(MetricsRegistry::new());
        let transport = Arc::new(HttpTransport::new(config)?);
        let sampler = Arc::new(SystemSampler::new());
        let reporter = Reporter::new(Arc::clone(&registry), sampler, transport, config).spawn(shutdown);

        Ok(Self { registry, reporter })
    }

    /// Registry to hand to request-handling code.
    pub fn registry(&self) -> &Arc<MetricsRegistry> {
        &self.registry
    }

    /// Stop the reporter, waiting at most `timeout`.
    pub async fn shutdown(self, timeout: Duration) -> ShutdownResult {
        self.reporter.shutdown(timeout).await
    }
}
