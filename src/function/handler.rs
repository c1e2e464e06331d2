//! Edge function trait, per-request context and error type.

use crate::http::{EdgeRequest, EdgeResponse, StatusCode};
use async_trait::async_trait;
use std::net::SocketAddr;

/// Execution context for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Name of the function being invoked.
    pub function_name: String,
    /// Request ID for tracing.
    pub request_id: String,
    /// Peer address, when the request came over a socket.
    pub remote_addr: Option<SocketAddr>,
}

impl FunctionContext {
    pub fn new(function_name: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: request_id.into(),
            remote_addr: None,
        }
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }
}

/// A stateless request handler in the style of a Workers `fetch` event.
///
/// The runtime hosts exactly one function and hands it every request, apart
/// from `/_health` when the health check is on. Implementations must not keep
/// per-request state.
#[async_trait]
pub trait EdgeFunction: Send + Sync {
    /// Handle an incoming HTTP request.
    async fn fetch(
        &self,
        request: EdgeRequest,
        ctx: &FunctionContext,
    ) -> Result<EdgeResponse, EdgeError>;

    /// Name used in logs and in the request context.
    fn name(&self) -> &str;
}

/// Error returned by an edge function; the runtime turns it into a
/// plain text response with `code` as the status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct EdgeError {
    pub message: String,
    pub code: u16,
}

impl EdgeError {
    /// Create an internal server error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR.0, message)
    }

    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST.0, message)
    }

    /// The upstream could not be reached or answered with something unusable.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_GATEWAY.0, message)
    }
}

impl From<EdgeError> for EdgeResponse {
    fn from(err: EdgeError) -> Self {
        EdgeResponse::error(err.code, err.message)
    }
}

impl From<reqwest::Error> for EdgeError {
    fn from(err: reqwest::Error) -> Self {
        EdgeError::bad_gateway(format!("upstream request failed: {}", err))
    }
}
