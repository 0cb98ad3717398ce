//! Request classification.
//!
//! # Responsibilities
//! - Classify a request path as a static asset or an API call
//! - Pick the upstream base URL for that classification
//!
//! # Design Decisions
//! - Paths under the configured static prefix go to the asset host,
//!   everything else goes to the API host
//! - Classification ignores method, headers and query string
//! - Pure and immutable after construction (thread-safe without locks)

use url::Url;

use crate::config::schema::UpstreamConfig;
use crate::config::validation::{parse_base, ValidationError};

/// The two kinds of traffic the relay handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    StaticAsset,
    ApiCall,
}

/// Outcome of classifying one request path.
#[derive(Debug, Clone, Copy)]
pub struct RouteDecision<'a> {
    pub kind: RouteKind,
    pub upstream_base: &'a Url,
}

/// Compiled routing table: both upstream bases plus the asset prefix.
#[derive(Debug)]
pub struct RouteTable {
    api_base: Url,
    asset_base: Url,
    static_prefix: String,
    api_host: String,
}

impl RouteTable {
    pub fn new(api_base: Url, asset_base: Url, static_prefix: impl Into<String>) -> Self {
        let api_host = api_base.host_str().unwrap_or_default().to_string();
        Self {
            api_base,
            asset_base,
            static_prefix: static_prefix.into(),
            api_host,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ValidationError> {
        let api_base = parse_base("upstream.api_base", &config.api_base)?;
        let asset_base = parse_base("upstream.asset_base", &config.asset_base)?;
        Ok(Self::new(api_base, asset_base, config.static_prefix.clone()))
    }

    /// Classify a request path and pick its upstream.
    ///
    /// The leading slash, if any, is ignored so that `/static/x` and
    /// `static/x` classify identically.
    pub fn decide(&self, path: &str) -> RouteDecision<'_> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        if trimmed.starts_with(&self.static_prefix) {
            RouteDecision {
                kind: RouteKind::StaticAsset,
                upstream_base: &self.asset_base,
            }
        } else {
            RouteDecision {
                kind: RouteKind::ApiCall,
                upstream_base: &self.api_base,
            }
        }
    }

    /// Hostname of the API upstream, forced onto outbound `Host` headers.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(
            Url::parse("https://us.i.posthog.com").unwrap(),
            Url::parse("https://us-assets.i.posthog.com").unwrap(),
            "static/",
        )
    }

    #[test]
    fn static_prefix_routes_to_asset_host() {
        let table = table();

        let decision = table.decide("/static/app.js");
        assert_eq!(decision.kind, RouteKind::StaticAsset);
        assert_eq!(
            decision.upstream_base.host_str(),
            Some("us-assets.i.posthog.com")
        );

        // same result without the leading slash
        let decision = table.decide("static/chunk-1.js");
        assert_eq!(decision.kind, RouteKind::StaticAsset);
    }

    #[test]
    fn everything_else_routes_to_api_host() {
        let table = table();

        for path in ["/", "/decide", "/capture", "/e/", "/staticish", "/s/static/"] {
            let decision = table.decide(path);
            assert_eq!(decision.kind, RouteKind::ApiCall, "path {path}");
            assert_eq!(decision.upstream_base.host_str(), Some("us.i.posthog.com"));
        }
    }

    #[test]
    fn prefix_must_match_at_segment_start() {
        let table = table();
        assert_eq!(table.decide("/api/static/app.js").kind, RouteKind::ApiCall);
    }

    #[test]
    fn api_host_comes_from_base_url() {
        assert_eq!(table().api_host(), "us.i.posthog.com");
    }
}
