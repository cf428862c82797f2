// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Payload delivery to the remote sink.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpTransport;

/// Errors that can occur while pushing a payload.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    /// Sink answered with a non-success status.
    #[error("sink rejected payload: HTTP {0}")]
    Status(u16),

    /// Client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

/// One-shot push of an already rendered payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn push(&self, payload: String) -> Result<(), TransportError>;
}
