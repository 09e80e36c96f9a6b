//! Configuration schema definitions.
//!
//! All types derive Serde traits so a config can come from a TOML file.
//! The same defaults back the CLI flags, so file, flags, and built-ins
//! cannot disagree about what "unset" means.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream target configuration.
    pub upstream: UpstreamConfig,

    /// CORS preflight handling.
    pub cors: CorsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin every request is forwarded to (scheme + host, e.g.
    /// "http://127.0.0.1:3000").
    pub target: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: "https://www.google.com".to_string(),
        }
    }
}

/// CORS preflight configuration.
///
/// The value fields only take effect while `enabled` is true; the proxy
/// forwards `OPTIONS` like any other method otherwise.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Answer OPTIONS preflights at the proxy instead of forwarding them.
    pub enabled: bool,

    /// `Access-Control-Allow-Methods` value.
    pub allow_methods: String,

    /// `Access-Control-Allow-Headers` value.
    pub allow_headers: String,

    /// `Access-Control-Allow-Origin` value.
    pub allow_origin: String,

    /// `Access-Control-Expose-Headers` value.
    pub expose_headers: String,

    /// `Access-Control-Max-Age` in seconds; also sized into the
    /// `Cache-Control: public, max-age=..` of the preflight answer.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_methods: "GET, POST, PUT, PATCH, DELETE".to_string(),
            allow_headers: "Origin, Content-Type, Accept, Authorization".to_string(),
            allow_origin: "*".to_string(),
            expose_headers: "Limit, Offset, Total".to_string(),
            max_age: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_flags() {
        let config = ProxyConfig::default();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.target, "https://www.google.com");
        assert!(!config.cors.enabled);
        assert_eq!(config.cors.allow_methods, "GET, POST, PUT, PATCH, DELETE");
        assert_eq!(
            config.cors.allow_headers,
            "Origin, Content-Type, Accept, Authorization"
        );
        assert_eq!(config.cors.allow_origin, "*");
        assert_eq!(config.cors.expose_headers, "Limit, Offset, Total");
        assert_eq!(config.cors.max_age, 3600);
    }
}
