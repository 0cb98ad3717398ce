//! Static asset pipeline.
//!
//! # Responsibilities
//! - Serve cached asset bodies without touching the network
//! - Fetch misses from the asset host and populate the cache
//! - Derive a content type when the upstream declares none
//!
//! # Design Decisions
//! - Asset fetches are always GET, whatever the inbound method was
//! - Cache hits are served as application/octet-stream; the cache keeps
//!   bytes only, so the original content type is gone on later reads
//! - Non-success upstream statuses pass through with an empty body and
//!   are never cached

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use url::Url;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::transport::OutboundRequest;

const OCTET_STREAM: HeaderValue = HeaderValue::from_static("application/octet-stream");
const JAVASCRIPT: HeaderValue = HeaderValue::from_static("application/javascript");

/// Serve one static asset request, cache first.
pub async fn serve(state: &AppState, upstream_base: &Url, uri: &Uri) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();

    if let Some(bytes) = state.cache.get(&key) {
        metrics::record_cache_hit();
        return asset_response(OCTET_STREAM, bytes);
    }
    metrics::record_cache_miss();

    let url = match upstream_base.join(&key) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(key = %key, error = %error, "asset path does not resolve against upstream base");
            return (StatusCode::BAD_REQUEST, "invalid asset path").into_response();
        }
    };

    let request = OutboundRequest {
        method: Method::GET,
        url,
        headers: Default::default(),
        body: None,
    };

    let upstream = match state.transport.send(request).await {
        Ok(upstream) => upstream,
        Err(error) => {
            tracing::error!(key = %key, error = %error, "asset upstream call failed");
            return (StatusCode::BAD_GATEWAY, "upstream request failed").into_response();
        }
    };

    if !upstream.status.is_success() {
        tracing::debug!(key = %key, status = %upstream.status, "asset upstream returned non-success");
        let mut response = Response::new(Body::empty());
        *response.status_mut() = upstream.status;
        return response;
    }

    let declared_type = upstream.headers.get(CONTENT_TYPE).cloned();
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!(key = %key, error = %error, "asset body read failed");
            return (StatusCode::BAD_GATEWAY, "upstream request failed").into_response();
        }
    };

    state.cache.insert(key, bytes.clone());

    let content_type = declared_type.unwrap_or_else(|| infer_content_type(uri.path()));
    asset_response(content_type, bytes)
}

fn asset_response(content_type: HeaderValue, bytes: Bytes) -> Response {
    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response
}

fn infer_content_type(path: &str) -> HeaderValue {
    if path.to_ascii_lowercase().ends_with(".js") {
        JAVASCRIPT
    } else {
        OCTET_STREAM
    }
}
