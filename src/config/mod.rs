//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → CLI flag overrides (cli.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → consumed once at startup by the handler constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts; changes require a restart
//! - All fields have defaults, so bare flags or a minimal file both work
//! - Validation separates syntactic (serde) from semantic checks and runs
//!   on the final overlaid value

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{CorsConfig, ListenerConfig, ProxyConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
