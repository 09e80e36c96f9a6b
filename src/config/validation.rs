//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream target is a usable http(s) origin
//! - Check CORS values encode as header bytes when CORS is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs on the final value, after CLI flags are overlaid

use axum::http::HeaderValue;

use crate::config::schema::ProxyConfig;
use crate::upstream::Origin;

/// A single semantic violation, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

/// Validate a configuration before the proxy starts serving.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Hostnames are resolved at bind time, so only the shape is checked.
    if !config.listener.bind_address.contains(':') {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!(
                "expected host:port, got {:?}",
                config.listener.bind_address
            ),
        });
    }

    if let Err(error) = Origin::parse(&config.upstream.target) {
        errors.push(ValidationError {
            field: "upstream.target",
            message: error.to_string(),
        });
    }

    if config.cors.enabled {
        for (field, value) in [
            ("cors.allow_methods", &config.cors.allow_methods),
            ("cors.allow_headers", &config.cors.allow_headers),
            ("cors.allow_origin", &config.cors.allow_origin),
            ("cors.expose_headers", &config.cors.expose_headers),
        ] {
            if HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError {
                    field,
                    message: format!("not a valid header value: {value:?}"),
                });
            }
        }
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
    use crate::config::schema::ProxyConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "no-port".to_string();
        config.upstream.target = "not a url".to_string();

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "listener.bind_address");
        assert_eq!(errors[1].field, "upstream.target");
    }

    #[test]
    fn cors_values_are_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.cors.allow_origin = "bad\nvalue".to_string();

        assert!(validate_config(&config).is_ok());

        config.cors.enabled = true;
        let errors = validate_config(&config).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cors.allow_origin");
    }
}
