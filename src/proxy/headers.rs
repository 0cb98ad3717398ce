//! Header filtering and augmentation for the outbound leg.
//!
//! # Responsibilities
//! - Copy inbound headers without clobbering content negotiation
//! - Strip credentials before anything leaves the relay
//! - Preserve client identity via X-Forwarded-For
//! - Drop framing headers the runtime manages itself
//!
//! # Design Decisions
//! - Content headers are handled by the body rules, never blanket-copied
//! - Copy never overwrites a header the pipeline set first
//! - Sensitive removal runs after the copy, unconditionally

use std::net::IpAddr;

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LENGTH,
    CONTENT_TYPE, COOKIE, HOST, TRANSFER_ENCODING,
};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

fn is_content_header(name: &HeaderName) -> bool {
    *name == CONTENT_TYPE
        || *name == CONTENT_LENGTH
        || *name == CONTENT_ENCODING
        || *name == TRANSFER_ENCODING
}

/// Copy every inbound header onto the outbound request, except content
/// headers and names the outbound map already carries.
pub fn copy_request_headers(inbound: &HeaderMap, outbound: &mut HeaderMap) {
    for name in inbound.keys() {
        if is_content_header(name) || outbound.contains_key(name) {
            continue;
        }
        for value in inbound.get_all(name) {
            outbound.append(name.clone(), value.clone());
        }
    }
}

/// Remove credentials and the client-supplied host.
///
/// `Host` is never blanket-copied in the first place; removing it here
/// keeps the guarantee independent of the copy rules.
pub fn strip_sensitive(headers: &mut HeaderMap) {
    headers.remove(COOKIE);
    headers.remove(AUTHORIZATION);
    headers.remove(HOST);
}

/// Force `Host` to the upstream hostname.
pub fn force_host(headers: &mut HeaderMap, host: &str) {
    if let Ok(value) = HeaderValue::from_str(host) {
        headers.insert(HOST, value);
    }
}

/// Append the client address to `X-Forwarded-For`, joining any existing
/// values with `, `.
pub fn append_forwarded_for(headers: &mut HeaderMap, client: IpAddr) {
    let mut chain: Vec<String> = headers
        .get_all(&X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect();
    chain.push(client.to_string());

    if let Ok(value) = HeaderValue::from_str(&chain.join(", ")) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

/// Copy upstream response headers onto the client response, dropping the
/// encodings the framework manages on its own leg.
pub fn copy_response_headers(upstream: &HeaderMap, client: &mut HeaderMap) {
    for name in upstream.keys() {
        if *name == TRANSFER_ENCODING || *name == CONTENT_ENCODING {
            continue;
        }
        for value in upstream.get_all(name) {
            client.append(name.clone(), value.clone());
        }
    }
}
