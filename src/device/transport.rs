//! HTTP transport to the device provider.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::protocol::{ControlRequest, ControlResponse, API_KEY_HEADER, CONTROL_PATH};

pub const DEFAULT_GOVEE_BASE_URL: &str = "https://openapi.api.govee.com";

/// Failure to complete a request/response exchange with the provider.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sends one control request and returns the provider's structural
/// response. Non-success response codes are not errors at this level.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    async fn send(&self, request: &ControlRequest) -> Result<ControlResponse, TransportError>;
}

pub struct GoveeHttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoveeHttpTransport {
    /// # Arguments
    /// * `base_url` - Base URL of the provider (e.g., "https://openapi.api.govee.com")
    /// * `api_key` - Sent in the `Govee-API-Key` header
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
        }
    }

    fn control_url(&self) -> String {
        format!("{}{}", self.base_url, CONTROL_PATH)
    }
}

#[async_trait]
impl DeviceTransport for GoveeHttpTransport {
    async fn send(&self, request: &ControlRequest) -> Result<ControlResponse, TransportError> {
        let response = self
            .client
            .post(self.control_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(format!("Failed to read body: {}", e)))?;

        debug!(
            request_id = %request.request_id,
            status = status.as_u16(),
            body = %body,
            "Device provider responded"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            TransportError::InvalidResponse(format!("{}, body: {}", e, body))
        })
    }
}
