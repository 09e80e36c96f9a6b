//! The transport that carries rewritten requests to the upstream.
//!
//! # Design Decisions
//! - The handler reaches the network only through the [`Forward`] trait, so
//!   tests can swap the transport for recording doubles
//! - Responses stay streamed end to end, the body is never collected

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// Error surfaced when the upstream could not be reached or answered.
#[derive(Debug, thiserror::Error)]
#[error("upstream request failed: {0}")]
pub struct ForwardError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl ForwardError {
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// The one capability the forwarding pipeline needs from the network.
#[async_trait]
pub trait Forward: Send + Sync {
    /// Send the rewritten request upstream and return the streamed response.
    async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError>;
}

/// Production transport: a pooled hyper client behind a TLS-capable
/// connector. Plain `http://` targets bypass TLS inside the connector, so
/// one client serves both schemes.
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl UpstreamClient {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpsConnector::new());
        Self { client }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forward for UpstreamClient {
    async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let response: Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(ForwardError::new)?;
        Ok(response.map(Body::new))
    }
}
