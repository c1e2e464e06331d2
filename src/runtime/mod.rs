//! Runtime hosting one edge function over HTTP/1.1.

mod config;
mod server;
mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub(crate) use config::parse_var;
pub use server::EdgeServer;
pub use telemetry::init_tracing;

/// Error type returned by the server entry points.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
