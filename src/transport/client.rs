//! reqwest-backed production transport.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};

use crate::config::schema::{TimeoutConfig, UpstreamConfig};
use crate::transport::{OutboundRequest, Transport, TransportError, UpstreamResponse};

/// Production transport over a pooled [`reqwest::Client`].
///
/// Redirects are never followed; the client sees exactly what the upstream
/// answered. Certificate validation is relaxed only when the config's
/// `accept_invalid_certs` flag says so.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn from_config(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs));

        if upstream.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connect(e.to_string())
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Body(e.to_string())
                }
            })
            .boxed();

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
