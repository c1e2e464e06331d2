//! Outbound fetch to the upstream endpoint.

use crate::function::EdgeError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::debug;

/// What the relay needs from the upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// `None` when the upstream sent no usable `Content-Type`.
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }
}

/// A single GET against the upstream.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str) -> Result<UpstreamResponse, EdgeError>;
}

/// [`Upstream`] backed by a `reqwest` client. No timeout and no retries:
/// a failed fetch is reported as is.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: &str, user_agent: &str) -> Result<UpstreamResponse, EdgeError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!("Upstream answered {} with {} bytes", status, body.len());

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
