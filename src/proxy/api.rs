//! API forwarding pipeline.
//!
//! # Responsibilities
//! - Rebuild the inbound request for the API upstream
//! - Apply the body rules before any header is copied
//! - Sanitize credentials, force Host, record the caller in X-Forwarded-For
//! - Translate the upstream reply onto the client connection, streaming
//!
//! # Design Decisions
//! - Bodies are buffered before dispatch; responses are not
//! - A transport fault maps to 502, an upstream error status passes through
//! - One attempt per request, never retried

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use url::Url;

use crate::http::server::AppState;
use crate::proxy::headers;
use crate::transport::{OutboundRequest, UpstreamResponse};

/// Forward one API request and translate the reply.
pub async fn forward(
    state: &AppState,
    upstream_base: &Url,
    mut parts: Parts,
    body: Body,
    client_addr: Option<SocketAddr>,
) -> Response {
    let (out_body, out_content_type) =
        match buffer_body(&parts.headers, body, state.max_body_bytes).await {
            Ok(plan) => plan,
            Err(error) => {
                tracing::warn!(error = %error, "failed to buffer request body");
                return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
            }
        };

    // the body is fully buffered now, so the inbound framing headers are stale
    parts.headers.remove(CONTENT_ENCODING);
    parts.headers.remove(TRANSFER_ENCODING);

    let mut outbound = HeaderMap::new();
    if let Some(content_type) = out_content_type {
        outbound.insert(CONTENT_TYPE, content_type);
    }
    headers::copy_request_headers(&parts.headers, &mut outbound);
    headers::strip_sensitive(&mut outbound);
    headers::force_host(&mut outbound, state.routes.api_host());
    if let Some(addr) = client_addr {
        headers::append_forwarded_for(&mut outbound, addr.ip());
    }

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = match upstream_base.join(target) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(path = target, error = %error, "request target does not resolve against upstream base");
            return (StatusCode::BAD_REQUEST, "invalid request target").into_response();
        }
    };

    let request = OutboundRequest {
        method: parts.method.clone(),
        url,
        headers: outbound,
        body: out_body,
    };

    match state.transport.send(request).await {
        Ok(upstream) => translate(upstream),
        Err(error) => {
            tracing::error!(error = %error, "api upstream call failed");
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}

/// Decide what body, if any, accompanies the outbound request.
///
/// A declared positive length or a form submission gets the inbound body
/// verbatim with its original content type. A JSON declaration without a
/// body still gets an explicit empty JSON body. Anything else sends none.
async fn buffer_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<(Option<Bytes>, Option<HeaderValue>), axum::Error> {
    let content_type = headers.get(CONTENT_TYPE).cloned();
    let type_str = content_type
        .as_ref()
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let is_form = type_str.starts_with("application/x-www-form-urlencoded")
        || type_str.starts_with("multipart/form-data");
    let is_json = type_str.starts_with("application/json");
    let declared_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    if declared_length > 0 || is_form {
        let bytes = axum::body::to_bytes(body, limit).await?;
        return Ok((Some(bytes), content_type));
    }
    if is_json {
        return Ok((
            Some(Bytes::new()),
            Some(HeaderValue::from_static("application/json")),
        ));
    }
    Ok((None, None))
}

/// Turn the upstream reply into the client-facing response.
///
/// Status passes through verbatim and the body is streamed, not buffered.
fn translate(upstream: UpstreamResponse) -> Response {
    let mut client_headers = HeaderMap::new();
    headers::copy_response_headers(&upstream.headers, &mut client_headers);

    let mut response = Response::new(Body::from_stream(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = client_headers;
    response
}
