//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RelayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_config_with_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("relay_loader_test.toml");
        fs::write(
            &path,
            r#"
[upstream]
api_base = "http://127.0.0.1:9000"

[cache]
ttl_secs = 120
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.upstream.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.cache.ttl_secs, 120);
        // untouched sections keep their defaults
        assert_eq!(config.upstream.static_prefix, "static/");
        assert_eq!(config.timeouts.upstream_secs, 30);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn surfaces_validation_errors() {
        let dir = std::env::temp_dir();
        let path = dir.join("relay_loader_invalid_test.toml");
        fs::write(
            &path,
            r#"
[cache]
ttl_secs = 0
"#,
        )
        .unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        fs::remove_file(&path).unwrap_or_default();
    }
}
