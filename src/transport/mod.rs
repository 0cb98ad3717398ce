//! Outbound HTTP transport.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (method, url, headers, body)
//!     → Transport::send (one attempt, no retries)
//!     → UpstreamResponse (status, headers, body stream)
//! ```
//!
//! # Design Decisions
//! - A trait seam so the pipeline can be driven by a fake in tests
//! - Response bodies are streams; buffering is the caller's choice
//! - Every call is attempted exactly once

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::{Bytes, BytesMut};
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use thiserror::Error;
use url::Url;

pub mod client;

pub use client::HttpTransport;

/// Failures at the transport boundary. Upstream error *statuses* are not
/// errors here; they come back as a normal [`UpstreamResponse`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream unreachable: {0}")]
    Connect(String),

    #[error("upstream body read failed: {0}")]
    Body(String),
}

/// A fully-built request for one upstream call.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// What came back from the upstream, body not yet consumed.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl UpstreamResponse {
    /// Wrap an already-buffered body, mainly for tests and fakes.
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, bytes: Bytes) -> Self {
        Self {
            status,
            headers,
            body: futures_util::stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    /// Read the whole body into memory.
    pub async fn bytes(mut self) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

/// The outbound transport collaborator.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// One request as the fake transport saw it.
    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub method: Method,
        pub url: Url,
        pub headers: HeaderMap,
        pub body: Option<Bytes>,
    }

    /// Scripted transport: records every request and pops queued replies.
    /// With an empty script it answers 200 with an empty body.
    #[derive(Default)]
    pub struct RecordingTransport {
        script: Mutex<VecDeque<Result<(StatusCode, HeaderMap, Bytes), TransportError>>>,
        requests: Mutex<Vec<SentRequest>>,
        calls: AtomicUsize,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, status: StatusCode, headers: HeaderMap, body: Bytes) {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok((status, headers, body)));
        }

        pub fn push_error(&self, error: TransportError) {
            self.script.lock().unwrap().push_back(Err(error));
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<SentRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> SentRequest {
            self.requests
                .lock()
                .unwrap()
                .last()
                .expect("no request recorded")
                .clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(SentRequest {
                method: request.method,
                url: request.url,
                headers: request.headers,
                body: request.body,
            });

            match self.script.lock().unwrap().pop_front() {
                Some(Ok((status, headers, body))) => {
                    Ok(UpstreamResponse::from_bytes(status, headers, body))
                }
                Some(Err(error)) => Err(error),
                None => Ok(UpstreamResponse::from_bytes(
                    StatusCode::OK,
                    HeaderMap::new(),
                    Bytes::new(),
                )),
            }
        }
    }
}
