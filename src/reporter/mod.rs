// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Periodic reporter: sample, encode, push.
//!
//! Each tick runs Idle → Sampling → Encoding → Pushing → Idle. The push runs
//! in its own task so the next tick keeps its own clock. A failed cycle is
//! logged and discarded; it never stops the timer.

mod cycle;

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{MetricsConfig, MIN_PERIOD_MS};
use crate::host::HostSampler;
use crate::line::{EncodeError, LineEncoder};
use crate::registry::MetricsRegistry;
use crate::shutdown::ReporterHandle;
use crate::telemetry::{CycleSpan, SpanExt};
use crate::transport::Transport;

/// Stage of a cycle that can fail before the push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Sampling,
    Encoding,
}

/// Reasons a cycle's batch was discarded.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("panic during {0:?}")]
    Panicked(CycleStage),
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Payload handed to a background push.
    Dispatched { lines: usize },
    /// Batch dropped before pushing.
    Discarded,
}

/// Result of a background push, as observed by its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    Failed,
}

/// Recurring metrics reporter.
pub struct Reporter {
    registry: Arc<MetricsRegistry>,
    sampler: Arc<dyn HostSampler>,
    transport: Arc<dyn Transport>,
    encoder: LineEncoder,
    period: Duration,
    cycles: u64,
    in_flight: Option<JoinHandle<PushOutcome>>,
}

impl Reporter {
    pub fn new(
        registry: Arc<MetricsRegistry>,
        sampler: Arc<dyn HostSampler>,
        transport: Arc<dyn Transport>,
        config: &MetricsConfig,
    ) -> Self {
        Self {
            registry,
            sampler,
            transport,
            encoder: LineEncoder::new(config.source.clone()),
            period: config.reporting_period.max(Duration::from_millis(MIN_PERIOD_MS)),
            cycles: 0,
            in_flight: None,
        }
    }

    /// Tick period, never below the configured floor.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run the sampling and encoding stages and render the payload.
    ///
    /// Panics inside those stages are caught and reported as
    /// [`ReportError::Panicked`].
    pub fn build_payload(&self) -> Result<(String, usize), ReportError> {
        let stage = Cell::new(CycleStage::Sampling);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let inputs = cycle::sample(&self.registry, self.sampler.as_ref());
            stage.set(CycleStage::Encoding);
            let batch = cycle::encode(&inputs, &self.encoder)?;
            Ok::<_, EncodeError>((batch.render("\n"), batch.len()))
        }));

        match result {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(e)) => Err(ReportError::Encode(e)),
            Err(_) => Err(ReportError::Panicked(stage.get())),
        }
    }

    /// Run one full cycle. Must be called inside a tokio runtime.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.cycles += 1;
        let span = CycleSpan::new(self.cycles);
        let _enter = span.enter();

        let built = self.build_payload();
        span.record_result(&built);

        match built {
            Ok((payload, lines)) => {
                span.record_lines(lines);
                self.dispatch(payload, lines);
                CycleOutcome::Dispatched { lines }
            }
            Err(e) => {
                warn!(cycle = self.cycles, error = %e, "discarding metrics batch");
                CycleOutcome::Discarded
            }
        }
    }

    fn dispatch(&mut self, payload: String, lines: usize) {
        if let Some(previous) = &self.in_flight {
            if !previous.is_finished() {
                debug!(cycle = self.cycles, "previous push still in flight");
            }
        }

        let transport = Arc::clone(&self.transport);
        let cycle = self.cycles;
        self.in_flight = Some(tokio::spawn(async move {
            // Inner task so a panicking transport surfaces as a JoinError here.
            let push = tokio::spawn(async move { transport.push(payload).await });
            match push.await {
                Ok(Ok(())) => {
                    debug!(cycle, lines, "pushed metrics");
                    PushOutcome::Delivered
                }
                Ok(Err(e)) => {
                    warn!(cycle, error = %e, "failed to push metrics");
                    PushOutcome::Failed
                }
                Err(e) => {
                    warn!(cycle, error = %e, "metrics push task aborted");
                    PushOutcome::Failed
                }
            }
        }));
    }

    /// Wait for the most recent push, if any. Returns `None` when nothing is
    /// outstanding or the push task was cancelled.
    pub async fn wait_in_flight(&mut self) -> Option<PushOutcome> {
        let handle = self.in_flight.take()?;
        handle.await.ok()
    }

    /// Spawn the recurring loop. The first cycle runs one period from now.
    pub fn spawn(self, shutdown: CancellationToken) -> ReporterHandle {
        let token = shutdown.clone();
        let join = tokio::spawn(self.run(shutdown));
        ReporterHandle::new(token, join)
    }

    async fn run(mut self, shutdown: CancellationToken) {
        info!(
            source = self.encoder.source(),
            period_ms = self.period.as_millis() as u64,
            "metrics reporter started"
        );

        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    info!(cycles = self.cycles, "metrics reporter: shutdown signal received");
                    break;
                }
                _ = interval.tick() => {
                    self.run_cycle();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SampleError;
    use crate::transport::TransportError;
    use async_trait::async_trait;

    struct FixedSampler;

    impl HostSampler for FixedSampler {
        fn cpu_ratio(&self) -> Result<f64, SampleError> {
            Ok(25.0)
        }
        fn memory_ratio(&self) -> Result<f64, SampleError> {
            Err(SampleError::NoMemory)
        }
    }

    struct PanickySampler;

    impl HostSampler for PanickySampler {
        fn cpu_ratio(&self) -> Result<f64, SampleError> {
            panic!("sampler exploded")
        }
        fn memory_ratio(&self) -> Result<f64, SampleError> {
            Ok(1.0)
        }
    }

    struct NullTransport;

    struct PanickyTransport;

    #[async_trait]
    impl Transport for PanickyTransport {
        async fn push(&self, _payload: String) -> Result<(), TransportError> {
            panic!("transport exploded")
        }
    }

    #[async_trait]
    impl Transport for NullTransport {
        async fn push(&self, _payload: String) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn test_config() -> MetricsConfig {
        MetricsConfig {
            source: "test".to_string(),
            ..MetricsConfig::default()
        }
    }

    fn reporter(sampler: Arc<dyn HostSampler>) -> Reporter {
        Reporter::new(
            Arc::new(MetricsRegistry::new()),
            sampler,
            Arc::new(NullTransport),
            &test_config(),
        )
    }

    #[test]
    fn test_failed_sample_omits_line() {
        let (payload, lines) = reporter(Arc::new(FixedSampler)).build_payload().unwrap();
        assert_eq!(lines, 12);
        assert!(payload.contains("system,source=test,type=\"cpu\" usage=25"));
        assert!(!payload.contains("type=\"memory\""));
    }

    #[test]
    fn test_panic_reported_with_stage() {
        let result = reporter(Arc::new(PanickySampler)).build_payload();
        assert!(matches!(result, Err(ReportError::Panicked(CycleStage::Sampling))));
    }

    #[tokio::test]
    async fn test_run_cycle_counts_cycles() {
        let mut r = reporter(Arc::new(FixedSampler));
        assert_eq!(r.run_cycle(), CycleOutcome::Dispatched { lines: 12 });
        assert_eq!(r.wait_in_flight().await, Some(PushOutcome::Delivered));
        assert_eq!(r.wait_in_flight().await, None);

        let mut r = reporter(Arc::new(PanickySampler));
        assert_eq!(r.run_cycle(), CycleOutcome::Discarded);
        assert_eq!(r.run_cycle(), CycleOutcome::Discarded);
        assert_eq!(r.cycles(), 2);
    }

    #[test]
    fn test_zero_period_raised_to_floor() {
        let config = MetricsConfig {
            reporting_period: Duration::ZERO,
            ..test_config()
        };
        let r = Reporter::new(
            Arc::new(MetricsRegistry::new()),
            Arc::new(FixedSampler),
            Arc::new(NullTransport),
            &config,
        );
        assert_eq!(r.period(), Duration::from_millis(MIN_PERIOD_MS));
    }

    #[tokio::test]
    async fn test_panicking_push_reported_as_failed() {
        let mut r = Reporter::new(
            Arc::new(MetricsRegistry::new()),
            Arc::new(FixedSampler),
            Arc::new(PanickyTransport),
            &test_config(),
        );
        assert_eq!(r.run_cycle(), CycleOutcome::Dispatched { lines: 12 });
        assert_eq!(r.wait_in_flight().await, Some(PushOutcome::Failed));

        // the reporter is still usable afterwards
        assert_eq!(r.run_cycle(), CycleOutcome::Dispatched { lines: 12 });
        assert_eq!(r.wait_in_flight().await, Some(PushOutcome::Failed));
    }
}
