//! Command-line interface.
//!
//! Flags mirror the original deployment tooling, camelCase spellings kept
//! as hidden aliases. A flag that is passed overrides the config file;
//! anything left unset falls back to the file value or the built-in
//! default.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ProxyConfig;

/// Single-origin reverse proxy with optional CORS preflight handling.
#[derive(Debug, Parser)]
#[command(name = "origin-proxy", version, about)]
pub struct Cli {
    /// Listen address
    #[arg(long)]
    pub addr: Option<String>,

    /// Upstream origin to forward to (scheme + host)
    #[arg(long)]
    pub target: Option<String>,

    /// Answer CORS preflights at the proxy
    #[arg(long)]
    pub cors: bool,

    /// Access-Control-Allow-Methods value
    #[arg(long, alias = "allowMethods")]
    pub allow_methods: Option<String>,

    /// Access-Control-Allow-Headers value
    #[arg(long, alias = "allowHeaders")]
    pub allow_headers: Option<String>,

    /// Access-Control-Allow-Origin value
    #[arg(long, alias = "allowOrigin")]
    pub allow_origin: Option<String>,

    /// Access-Control-Expose-Headers value
    #[arg(long, alias = "exposeHeaders")]
    pub expose_headers: Option<String>,

    /// Access-Control-Max-Age in seconds
    #[arg(long, alias = "maxAge")]
    pub max_age: Option<u64>,

    /// Optional TOML config file; flags take precedence over it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overlay the flags that were actually passed onto `config`.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(addr) = &self.addr {
            config.listener.bind_address = addr.clone();
        }
        if let Some(target) = &self.target {
            config.upstream.target = target.clone();
        }
        if self.cors {
            config.cors.enabled = true;
        }
        if let Some(value) = &self.allow_methods {
            config.cors.allow_methods = value.clone();
        }
        if let Some(value) = &self.allow_headers {
            config.cors.allow_headers = value.clone();
        }
        if let Some(value) = &self.allow_origin {
            config.cors.allow_origin = value.clone();
        }
        if let Some(value) = &self.expose_headers {
            config.cors.expose_headers = value.clone();
        }
        if let Some(value) = self.max_age {
            config.cors.max_age = value;
        }
    }
}
