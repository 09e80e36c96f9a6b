//! The forwarding pipeline.
//!
//! # Responsibilities
//! - Log one access record per request
//! - Normalize headers (hop-by-hop strip, X-Forwarded-For chain)
//! - Answer CORS preflights locally when enabled
//! - Rewrite the target line and relay everything else upstream
//!
//! # Design Decisions
//! - One pipeline for every method; CORS is a boolean gate inside it, not a
//!   second handler
//! - The handler owns no sockets: the network sits behind [`Forward`]
//! - Upstream failures map to 502 for that request and nothing else

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode, Uri};

use crate::config::ProxyConfig;
use crate::http::cors::{CorsPolicy, InvalidCorsValue};
use crate::http::headers::{append_forwarded_for, strip_hop_by_hop, X_FORWARDED_HOST};
use crate::upstream::{Forward, Origin, OriginError};

/// Error constructing a handler from configuration.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid upstream target: {0}")]
    Origin(#[from] OriginError),

    #[error(transparent)]
    Cors(#[from] InvalidCorsValue),
}

/// Per-request decision point of the proxy.
///
/// Holds the pieces derived from [`ProxyConfig`] at startup plus a shared
/// transport. Nothing here mutates after construction, so requests borrow
/// it concurrently without locking.
pub struct ForwardingHandler {
    origin: Origin,
    cors: Option<CorsPolicy>,
    transport: Arc<dyn Forward>,
}

impl std::fmt::Debug for ForwardingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingHandler")
            .field("origin", &self.origin)
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

impl ForwardingHandler {
    /// Build a handler; fails when the target or CORS values are unusable.
    pub fn from_config(
        config: &ProxyConfig,
        transport: Arc<dyn Forward>,
    ) -> Result<Self, HandlerError> {
        let origin = Origin::parse(&config.upstream.target)?;
        let cors = if config.cors.enabled {
            Some(CorsPolicy::from_config(&config.cors)?)
        } else {
            None
        };
        Ok(Self {
            origin,
            cors,
            transport,
        })
    }

    /// Handle one inbound request end to end.
    pub async fn handle(&self, mut request: Request<Body>) -> Response<Body> {
        // Peer info is best effort; tests drive the handler without a socket.
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let peer_label = peer
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "-".to_string());

        tracing::info!(
            peer = %peer_label,
            method = %request.method(),
            uri = %request.uri(),
            "Proxying request"
        );

        strip_hop_by_hop(request.headers_mut());

        if let Some(peer) = peer {
            append_forwarded_for(request.headers_mut(), peer.ip());
        }

        if let Some(cors) = &self.cors {
            if request.method() == Method::OPTIONS {
                return cors.preflight_response();
            }
        }

        self.forward(request).await
    }

    /// Rewrite the target line and relay through the transport.
    async fn forward(&self, mut request: Request<Body>) -> Response<Body> {
        // The Host the client addressed, captured before the rewrite. HTTP/2
        // requests carry it in the URI authority instead of a Host header.
        let original_host = request.headers().get(header::HOST).cloned().or_else(|| {
            request
                .uri()
                .authority()
                .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
        });

        let mut parts = request.uri().clone().into_parts();
        parts.scheme = Some(self.origin.scheme().clone());
        parts.authority = Some(self.origin.authority().clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        match Uri::from_parts(parts) {
            Ok(uri) => *request.uri_mut() = uri,
            Err(error) => {
                tracing::error!(%error, "Inbound URI could not be retargeted");
                return status_response(StatusCode::BAD_REQUEST, "Bad Request");
            }
        }

        if let Some(host) = original_host {
            request.headers_mut().insert(X_FORWARDED_HOST, host);
        }
        request
            .headers_mut()
            .insert(header::HOST, self.origin.host_header().clone());

        match self.transport.forward(request).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, body)
            }
            Err(error) => {
                tracing::error!(error = %error, target = %self.origin, "Upstream error");
                status_response(StatusCode::BAD_GATEWAY, "Upstream request failed")
            }
        }
    }
}

fn status_response(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}
