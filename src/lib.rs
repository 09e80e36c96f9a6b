//! Single-Origin Reverse Proxy Library

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::{ForwardingHandler, HttpServer};
pub use lifecycle::Shutdown;
