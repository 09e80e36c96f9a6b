//! CORS preflight policy.
//!
//! When enabled, the proxy answers `OPTIONS` preflights itself instead of
//! spending a backend round trip on them. Configured values are validated
//! and encoded once at startup, so building the per-request answer cannot
//! fail.

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, CACHE_CONTROL, PRAGMA,
};
use axum::http::{HeaderValue, Response, StatusCode};

use crate::config::CorsConfig;

/// Error raised when a configured CORS value is not legal header bytes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cors.{field} is not a valid header value: {value:?}")]
pub struct InvalidCorsValue {
    pub field: &'static str,
    pub value: String,
}

/// Pre-encoded preflight headers derived from [`CorsConfig`].
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
    allow_origin: HeaderValue,
    expose_headers: HeaderValue,
    max_age: HeaderValue,
    cache_control: HeaderValue,
}

impl CorsPolicy {
    /// Encode a policy from configuration, rejecting unusable values.
    pub fn from_config(cors: &CorsConfig) -> Result<Self, InvalidCorsValue> {
        Ok(Self {
            allow_headers: encode("allow_headers", &cors.allow_headers)?,
            allow_methods: encode("allow_methods", &cors.allow_methods)?,
            allow_origin: encode("allow_origin", &cors.allow_origin)?,
            expose_headers: encode("expose_headers", &cors.expose_headers)?,
            max_age: encode("max_age", &cors.max_age.to_string())?,
            cache_control: encode("max_age", &format!("public, max-age={}", cors.max_age))?,
        })
    }

    /// The preflight answer: 204 No Content carrying the configured values,
    /// plus caching headers sized to `max_age`.
    pub fn preflight_response(&self) -> Response<Body> {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, self.expose_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        headers.insert(CACHE_CONTROL, self.cache_control.clone());
        headers.insert(PRAGMA, HeaderValue::from_static("Public"));

        response
    }
}

fn encode(field: &'static str, value: &str) -> Result<HeaderValue, InvalidCorsValue> {
    HeaderValue::from_str(value).map_err(|_| InvalidCorsValue {
        field,
        value: value.to_string(),
    })
}
