//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect-info, middleware)
//!     → handler.rs (access log, header normalization, preflight | forward)
//!     → headers.rs / cors.rs (rewrite rules, preflight policy)
//!     → upstream transport
//!     → Send to client
//! ```

pub mod cors;
pub mod handler;
pub mod headers;
pub mod server;

pub use handler::{ForwardingHandler, HandlerError};
pub use server::HttpServer;
