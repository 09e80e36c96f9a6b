//! Upstream subsystem: the fixed target and the transport that reaches it.

pub mod client;
pub mod origin;

pub use client::{Forward, ForwardError, UpstreamClient};
pub use origin::{Origin, OriginError};
