//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router; every method on every path lands in the one
//!   forwarding handler
//! - Wire up middleware (tracing)
//! - Expose peer addresses to the handler via connect-info
//! - Serve until the shutdown signal fires, then drain in-flight requests

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::handler::{ForwardingHandler, HandlerError};
use crate::upstream::UpstreamClient;

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Wire the router around an already constructed handler.
    pub fn new(handler: Arc<ForwardingHandler>) -> Self {
        let router = Router::new()
            .route("/{*path}", any(forward_request))
            .route("/", any(forward_request))
            .with_state(handler)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Full production wiring: TLS-capable client, handler, router.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, HandlerError> {
        let transport = Arc::new(UpstreamClient::new());
        let handler = Arc::new(ForwardingHandler::from_config(config, transport)?);
        Ok(Self::new(handler))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server in tests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn forward_request(
    State(handler): State<Arc<ForwardingHandler>>,
    request: Request<Body>,
) -> Response<Body> {
    handler.handle(request).await
}
