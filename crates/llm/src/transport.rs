use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use textbrief_common::{Result, TextBriefError};
use tracing::debug;

use crate::adapter::{UpstreamRequest, UpstreamResponse};

/// Issues one HTTP call; no retries
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create new transport with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TextBriefError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
        debug!("POST {}", request.url);

        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TextBriefError::Timeout(self.timeout)
            } else {
                TextBriefError::network(format!("Failed to send request: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TextBriefError::network(format!("Failed to read response body: {}", e)))?;

        debug!("Upstream answered - Status: {}, Body length: {}", status, body.len());

        Ok(UpstreamResponse { status, body })
    }
}
