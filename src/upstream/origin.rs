//! The fixed upstream origin.

use axum::http::uri::{Authority, Scheme};
use axum::http::HeaderValue;
use url::Url;

/// Error returned when a target origin cannot be used.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OriginError {
    #[error("not an absolute http(s) URL: {0:?}")]
    Parse(String),
    #[error("unsupported scheme {scheme:?}, only http and https are proxied")]
    Scheme { scheme: String },
}

/// Validated scheme and authority of the upstream target.
///
/// Parsed once at startup. Every forwarded request is rewritten against it,
/// so the pieces the rewrite needs are precomputed here rather than
/// re-parsed per request.
#[derive(Debug, Clone)]
pub struct Origin {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl Origin {
    /// Parse and validate a target such as `https://backend.internal:8443`.
    /// Any path on the URL is ignored; only the origin part is kept.
    pub fn parse(target: &str) -> Result<Self, OriginError> {
        let url = Url::parse(target).map_err(|_| OriginError::Parse(target.to_string()))?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(OriginError::Scheme {
                    scheme: other.to_string(),
                })
            }
        };

        let host = url
            .host_str()
            .ok_or_else(|| OriginError::Parse(target.to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority: Authority = authority
            .parse()
            .map_err(|_| OriginError::Parse(target.to_string()))?;
        let host_header = HeaderValue::from_str(authority.as_str())
            .map_err(|_| OriginError::Parse(target.to_string()))?;

        Ok(Self {
            scheme,
            authority,
            host_header,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// `Host` header value addressed at the backend.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
