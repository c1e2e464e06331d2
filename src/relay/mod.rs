//! Single-route relay: one GET to a configured upstream, response passed back.

mod config;
mod function;
mod upstream;

pub use config::{InvalidJsonPolicy, RelayConfig, DEFAULT_UPSTREAM_URL, DEFAULT_USER_AGENT};
pub use function::{relay_body, RelayFunction};
pub use upstream::{HttpUpstream, Upstream, UpstreamResponse};
