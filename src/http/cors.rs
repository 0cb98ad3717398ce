//! Cross-origin policy.
//!
//! # Responsibilities
//! - Allow the configured site domain and any of its subdomains
//! - Mirror requested methods and headers, allow credentials
//! - Treat malformed Origin values as not allowed
//!
//! # Design Decisions
//! - Hostname comparison only; scheme and port do not matter
//! - Fail closed: anything that does not parse is denied

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use url::Url;

use crate::config::schema::CorsConfig;

/// Build the CORS layer from config.
pub fn layer(config: &CorsConfig) -> CorsLayer {
    let base = config
        .base_domain
        .trim()
        .trim_start_matches('.')
        .to_ascii_lowercase();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin_allowed(origin, &base)
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn origin_allowed(origin: &HeaderValue, base: &str) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    match host.to_ascii_lowercase().strip_suffix(base) {
        Some("") => true,
        Some(rest) => rest.ends_with('.'),
        None => false,
    }
}
