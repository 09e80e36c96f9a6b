//! Shared utilities for integration testing.
//!
//! The echo backend reports every request it saw back as JSON, so tests can
//! assert on what actually crossed the proxy hop. It also sets one custom
//! and two hop-by-hop response headers, which the proxy is expected to
//! relay and strip respectively.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use origin_proxy::config::ProxyConfig;
use origin_proxy::http::HttpServer;
use origin_proxy::lifecycle::Shutdown;

/// What the echo backend saw for one request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

/// Counters shared with the test body.
pub struct BackendState {
    pub hits: AtomicU64,
}

/// Start an echo backend on an ephemeral port.
pub async fn start_echo_backend() -> (SocketAddr, Arc<BackendState>) {
    let state = Arc::new(BackendState {
        hits: AtomicU64::new(0),
    });

    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

async fn echo(State(state): State<Arc<BackendState>>, request: Request<Body>) -> Response<Body> {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in request.headers() {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).to_string());
    }
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    let echo = Echo {
        method,
        uri,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .header("x-echo-backend", "1")
        .header("keep-alive", "timeout=5")
        .header("proxy-authenticate", "Basic realm=echo")
        .body(Body::from(serde_json::to_vec(&echo).unwrap()))
        .unwrap()
}

/// Proxy config pointing at `backend`, CORS off.
pub fn proxy_config(backend: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.target = format!("http://{backend}");
    config
}

/// Spawn the proxy on an ephemeral port for one test.
///
/// Returns the address to hit and the shutdown handle that tears the
/// server down at the end of the test.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::from_config(&config).unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

/// A client that talks to the local proxy directly.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
