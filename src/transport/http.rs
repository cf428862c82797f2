// Copyright 2024-2026 Pulse-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Authenticated HTTP POST transport.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{Transport, TransportError};
use crate::config::MetricsConfig;

/// Pushes payloads with `Authorization: Bearer <user_id>:<api_key>`.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    bearer: String,
}

impl HttpTransport {
    pub fn new(config: &MetricsConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.push_timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            url: config.endpoint_url.clone(),
            bearer: bearer_value(&config.user_id, &config.api_key),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn bearer_value(user_id: &str, api_key: &str) -> String {
    format!("Bearer {}:{}", user_id, api_key)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn push(&self, payload: String) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.bearer)
            .header(CONTENT_TYPE, "text/plain")
            .body(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(response.status().as_u16()))
        }
    }
}
