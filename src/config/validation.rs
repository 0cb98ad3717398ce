//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream bases are absolute http(s) URLs
//! - Validate value ranges (timeouts > 0, TTL > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{field}: not a valid absolute URL ({reason})")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field}: must use the http or https scheme")]
    UnsupportedScheme { field: &'static str },

    #[error("{field}: must have a host")]
    MissingHost { field: &'static str },

    #[error("{field}: must not be zero")]
    Zero { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: must not start with '/'")]
    LeadingSlash { field: &'static str },

    #[error("{field}: not a valid socket address ({reason})")]
    InvalidAddress { field: &'static str, reason: String },
}

/// Parse an upstream base URL, enforcing scheme and host.
pub(crate) fn parse_base(field: &'static str, value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value).map_err(|e| ValidationError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme { field });
    }
    if url.host_str().is_none() {
        return Err(ValidationError::MissingHost { field });
    }
    Ok(url)
}

/// Validate a parsed config, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| ValidationError::InvalidAddress {
            field: "listener.bind_address",
            reason: e.to_string(),
        })
    {
        errors.push(e);
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_body_bytes",
        });
    }

    if let Err(e) = parse_base("upstream.api_base", &config.upstream.api_base) {
        errors.push(e);
    }
    if let Err(e) = parse_base("upstream.asset_base", &config.upstream.asset_base) {
        errors.push(e);
    }
    if config.upstream.static_prefix.is_empty() {
        errors.push(ValidationError::Empty {
            field: "upstream.static_prefix",
        });
    } else if config.upstream.static_prefix.starts_with('/') {
        errors.push(ValidationError::LeadingSlash {
            field: "upstream.static_prefix",
        });
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "cache.ttl_secs",
        });
    }
    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.cors.base_domain.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "cors.base_domain",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_relative_base() {
        let mut config = RelayConfig::default();
        config.upstream.api_base = "us.i.posthog.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut config = RelayConfig::default();
        config.upstream.asset_base = "ftp://assets.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::UnsupportedScheme {
                field: "upstream.asset_base"
            }
        ));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RelayConfig::default();
        config.cache.ttl_secs = 0;
        config.cors.base_domain = String::new();
        config.upstream.static_prefix = "/static/".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
