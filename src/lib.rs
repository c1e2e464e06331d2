//! # fitrelay
//!
//! Two small, unrelated edge functions served by a minimal hyper runtime:
//!
//! - [`calculator`]: U.S. Navy method body-fat estimate with its
//!   classification band and scale marker;
//! - [`relay`]: a single-route pass-through that fetches one configured
//!   upstream URL and answers with its status, content type and body.
//!
//! ## Architecture
//!
//! ```text
//!            any request                     GET, fixed User-Agent
//! client ─────────────────▶ EdgeServer ─▶ RelayFunction ─────────────────▶ upstream
//!        ◀─────────────────             ◀─ status + Content-Type + body ◀──
//! ```
//!
//! Each process hosts exactly one [`EdgeFunction`]. There is no routing:
//! every path reaches that function. The runtime answers `/_health` itself
//! only when `EDGE_HEALTH` is switched on.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fitrelay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BoxError> {
//!     let relay = RelayFunction::from_config(RelayConfig::from_env()?)?;
//!     EdgeServer::new(ServerConfig::from_env()?, relay).run().await
//! }
//! ```

pub mod calculator;
pub mod function;
pub mod http;
pub mod relay;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::calculator::{calculate, BodyFatFunction, HtmlSink, InputSource, ResultSink};
    pub use crate::function::{EdgeError, EdgeFunction, FunctionContext};
    pub use crate::http::{EdgeRequest, EdgeResponse, Method, StatusCode};
    pub use crate::relay::{InvalidJsonPolicy, RelayConfig, RelayFunction};
    pub use crate::runtime::{BoxError, EdgeServer, ServerConfig};
    pub use async_trait::async_trait;
}

pub use function::{EdgeError, EdgeFunction, FunctionContext};
pub use http::{EdgeRequest, EdgeResponse};
pub use runtime::{ConfigError, EdgeServer, ServerConfig};
