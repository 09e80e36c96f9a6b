//! Single-Origin Reverse Proxy
//!
//! A small forwarding proxy built with Tokio and Axum. Every request is
//! relayed to one configured upstream origin; optionally the proxy answers
//! CORS preflights itself.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 ORIGIN PROXY                  │
//!                        │                                               │
//!     Client Request     │  ┌─────────┐      ┌───────────────────┐      │
//!     ───────────────────┼─▶│  http   │─────▶│ ForwardingHandler │      │
//!                        │  │ server  │      │ strip hop-by-hop  │      │
//!                        │  └─────────┘      │ X-Forwarded-*     │      │
//!                        │                   └─────┬──────┬──────┘      │
//!                        │        OPTIONS + CORS   │      │             │
//!                        │              ┌──────────┘      │             │
//!                        │              ▼                 ▼             │
//!     Client Response    │       ┌───────────┐     ┌──────────┐        │
//!     ◀──────────────────┼───────│ preflight │     │ upstream │◀───────┼──── Backend
//!                        │       │    204    │     │  client  │        │
//!                        │       └───────────┘     └──────────┘        │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐ │
//!                        │  │      Cross-Cutting Concerns             │ │
//!                        │  │  config (file + flags) · lifecycle      │ │
//!                        │  │  tracing / access log                   │ │
//!                        │  └─────────────────────────────────────────┘ │
//!                        └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use origin_proxy::cli::Cli;
use origin_proxy::config::{self, ConfigError, ProxyConfig};
use origin_proxy::http::HttpServer;
use origin_proxy::lifecycle::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "origin_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Defaults → optional file → flags, validated once as a whole.
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(errors) = config::validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        return Err(ConfigError::Validation(errors).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        target = %config.upstream.target,
        "Configuration loaded"
    );
    if config.cors.enabled {
        tracing::info!(
            allow_methods = %config.cors.allow_methods,
            allow_headers = %config.cors.allow_headers,
            allow_origin = %config.cors.allow_origin,
            expose_headers = %config.cors.expose_headers,
            max_age = config.cors.max_age,
            "CORS preflight handling enabled"
        );
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Create and run HTTP server
    let server = HttpServer::from_config(&config)?;

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    shutdown.trigger_on_ctrl_c();

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
