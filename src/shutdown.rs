// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reporter lifecycle handle.
//!
//! The reporter loop stops when its cancellation token fires. The host owns
//! the token; dropping the handle does not stop the loop.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Result of a shutdown operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownResult {
    Complete,
    /// Loop did not stop before the deadline and was aborted.
    Timeout,
}

/// Handle to a spawned reporter loop.
pub struct ReporterHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl ReporterHandle {
    pub(crate) fn new(token: CancellationToken, join: JoinHandle<()>) -> Self {
        Self { token, join }
    }

    /// Signal the loop to stop without waiting.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel and wait for the loop to exit, up to `timeout`.
    pub async fn shutdown(self, timeout: Duration) -> ShutdownResult {
        self.token.cancel();

        let mut join = self.join;
        match tokio::time::timeout(timeout, &mut join).await {
            Ok(Ok(())) => ShutdownResult::Complete,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "metrics reporter task ended abnormally");
                ShutdownResult::Complete
            }
            Err(_) => {
                join.abort();
                ShutdownResult::Timeout
            }
        }
    }
}
