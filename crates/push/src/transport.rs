//! HTTP seam to the browser vendors' push services.
//!
//! The dispatcher only ever sees the [`PushTransport`] trait, so tests can
//! inject a fake that scripts per-endpoint responses. The production
//! implementation is a thin reqwest wrapper with a short timeout — push
//! services answer quickly, and a slow endpoint must not stall the fan-out.

use std::time::Duration;

use async_trait::async_trait;

use crate::request::DeliveryRequest;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for transport-level failures (no HTTP status was obtained).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The push service did not respond within the timeout.
    #[error("request timed out")]
    Timeout,

    /// The request failed below HTTP (DNS, TLS, connection reset, ...).
    #[error("network error: {0}")]
    Network(String),
}

/// Sends one encrypted delivery request and reports the raw HTTP status.
///
/// Classification of the status (success / transient / terminal) is the
/// dispatcher's job, not the transport's.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn post(&self, request: &DeliveryRequest) -> Result<u16, TransportError>;
}

/// Production transport over a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a pre-configured HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushTransport for ReqwestTransport {
    async fn post(&self, request: &DeliveryRequest) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(&request.endpoint)
            .header("Authorization", &request.authorization)
            .header("Content-Encoding", "aes128gcm")
            .header("Content-Type", "application/octet-stream")
            .header("TTL", request.ttl_secs.to_string())
            .header("Urgency", "normal")
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _transport = ReqwestTransport::new();
    }

    #[test]
    fn transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        assert_eq!(
            TransportError::Network("connection refused".into()).to_string(),
            "network error: connection refused"
        );
    }
}
