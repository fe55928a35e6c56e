//! Native query client for headless hosts and tooling

use crate::client::{decode_response, QueryClient, QueryFuture};
use explorer_config::EndpointConfig;
use explorer_shared::{ExplorerError, ExplorerResult, QueryRequest};
use std::time::Duration;

/// POSTs query payloads with `reqwest`. Must be driven from a Tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    url: String,
    timeout_ms: u32,
}

impl HttpClient {
    /// `url` must be absolute; resolve relative endpoints first.
    pub fn new(url: impl Into<String>, timeout_ms: u32) -> ExplorerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(u64::from(timeout_ms)))
            .build()
            .map_err(|e| ExplorerError::Internal {
                message: format!("Failed to create client: {e}"),
            })?;

        Ok(Self {
            client,
            url: url.into(),
            timeout_ms,
        })
    }

    pub fn from_endpoint(endpoint: &EndpointConfig, base_url: &str) -> ExplorerResult<Self> {
        let url = endpoint.resolve(base_url)?;
        Self::new(url, endpoint.timeout_ms)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QueryClient for HttpClient {
    fn send(&self, request: &QueryRequest) -> QueryFuture {
        let client = self.client.clone();
        let url = self.url.clone();
        let timeout_ms = self.timeout_ms;
        let payload = request.to_payload();

        Box::pin(async move {
            let payload = payload?;
            log::debug!("POST {url} ({} bytes)", payload.len());

            let response = client
                .post(&url)
                .header("Content-Type", "application/json")
                .body(payload)
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout_ms))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, timeout_ms))?;

            decode_response(status, &body)
        })
    }
}

fn map_reqwest_error(error: reqwest::Error, timeout_ms: u32) -> ExplorerError {
    if error.is_timeout() {
        ExplorerError::Timeout {
            message: error.to_string(),
            duration_ms: u64::from(timeout_ms),
        }
    } else {
        ExplorerError::transport(error.to_string())
    }
}
