//! Fetch-and-relay handler.

use crate::function::{EdgeError, EdgeFunction, FunctionContext};
use crate::http::{EdgeRequest, EdgeResponse};
use crate::relay::config::{InvalidJsonPolicy, RelayConfig};
use crate::relay::upstream::{HttpUpstream, Upstream};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

const JSON_MEDIA_TYPE: &str = "application/json";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Answers every request with the upstream's current response.
///
/// Nothing from the inbound request is forwarded. The reply carries the
/// upstream status, the upstream body (JSON re-encoded compactly) and a
/// single `Content-Type` header echoing the upstream's, empty if it had none.
pub struct RelayFunction<U = HttpUpstream> {
    config: RelayConfig,
    upstream: U,
}

impl RelayFunction<HttpUpstream> {
    pub fn from_config(config: RelayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_upstream(config, HttpUpstream::new()?))
    }
}

impl<U: Upstream> RelayFunction<U> {
    pub fn with_upstream(config: RelayConfig, upstream: U) -> Self {
        Self { config, upstream }
    }
}

#[async_trait]
impl<U: Upstream + 'static> EdgeFunction for RelayFunction<U> {
    async fn fetch(
        &self,
        _request: EdgeRequest,
        ctx: &FunctionContext,
    ) -> Result<EdgeResponse, EdgeError> {
        let upstream = self
            .upstream
            .get(&self.config.upstream_url, &self.config.user_agent)
            .await?;

        let content_type = upstream.content_type.unwrap_or_default();
        let body = relay_body(&content_type, upstream.body, self.config.invalid_json)?;

        debug!(
            "Relaying {} ({:?}, {} bytes) [{}]",
            upstream.status,
            content_type,
            body.len(),
            ctx.request_id
        );

        Ok(EdgeResponse::new(upstream.status)
            .header("Content-Type", content_type)
            .body(body))
    }

    fn name(&self) -> &str {
        "relay"
    }
}

/// Body to send back for an upstream body of `content_type`.
///
/// JSON is decoded and re-encoded, which drops insignificant whitespace and
/// a leading byte order mark but keeps key order. Anything else is returned
/// byte for byte.
pub fn relay_body(
    content_type: &str,
    body: Bytes,
    policy: InvalidJsonPolicy,
) -> Result<Bytes, EdgeError> {
    if !content_type.contains(JSON_MEDIA_TYPE) {
        return Ok(body);
    }

    let json = body.strip_prefix(UTF8_BOM).unwrap_or(&body[..]);
    let value = match serde_json::from_slice::<serde_json::Value>(json) {
        Ok(value) => value,
        Err(err) => match policy {
            InvalidJsonPolicy::Fail => {
                return Err(EdgeError::bad_gateway(format!(
                    "upstream sent invalid JSON: {}",
                    err
                )))
            }
            InvalidJsonPolicy::PassThrough => {
                warn!("Upstream sent invalid JSON, relaying raw body: {}", err);
                return Ok(body);
            }
        },
    };

    serde_json::to_vec(&value)
        .map(Bytes::from)
        .map_err(|err| EdgeError::new(format!("failed to encode JSON: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, StatusCode};
    use crate::relay::upstream::UpstreamResponse;
    use std::sync::Mutex;

    /// Upstream double returning a canned response and recording calls.
    struct StubUpstream {
        response: Result<UpstreamResponse, EdgeError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubUpstream {
        fn answering(response: UpstreamResponse) -> Self {
            Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: EdgeError) -> Self {
            Self {
                response: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        async fn get(&self, url: &str, user_agent: &str) -> Result<UpstreamResponse, EdgeError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), user_agent.to_string()));
            self.response.clone()
        }
    }

    fn relay(upstream: StubUpstream) -> RelayFunction<StubUpstream> {
        RelayFunction::with_upstream(
            RelayConfig::new("https://upstream.test/latest").user_agent("Mozilla/5.0"),
            upstream,
        )
    }

    fn ctx() -> FunctionContext {
        FunctionContext::new("relay", "req-1")
    }

    #[tokio::test]
    async fn relays_json_re_encoded() {
        let function = relay(StubUpstream::answering(UpstreamResponse::new(
            200,
            Some("application/json"),
            "{ \"a\" : 1 }",
        )));

        let response = function.fetch(EdgeRequest::default(), &ctx()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text_body().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(response.headers.len(), 1);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn relays_text_unchanged() {
        let function = relay(StubUpstream::answering(UpstreamResponse::new(
            503,
            Some("text/plain"),
            "hello",
        )));

        let response = function.fetch(EdgeRequest::default(), &ctx()).await.unwrap();

        assert_eq!(response.status, StatusCode(503));
        assert_eq!(response.text_body().as_deref(), Some("hello"));
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn missing_content_type_echoes_empty_header() {
        let function = relay(StubUpstream::answering(UpstreamResponse::new(
            200,
            None,
            "{not json",
        )));

        let response = function.fetch(EdgeRequest::default(), &ctx()).await.unwrap();

        assert_eq!(response.headers.get("Content-Type").map(String::as_str), Some(""));
        assert_eq!(response.text_body().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn inbound_request_is_not_forwarded() {
        let upstream = StubUpstream::answering(UpstreamResponse::new(200, None, ""));
        let function = relay(upstream);
        let inbound = EdgeRequest::new(Method::Post, "/anything?x=1")
            .header("User-Agent", "curl/8.0")
            .body("payload");

        function.fetch(inbound, &ctx()).await.unwrap();

        let calls = function.upstream.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "https://upstream.test/latest".to_string(),
                "Mozilla/5.0".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn upstream_failure_fails_the_request() {
        let function = relay(StubUpstream::failing(EdgeError::bad_gateway("connection refused")));

        let err = function.fetch(EdgeRequest::default(), &ctx()).await.unwrap_err();

        assert_eq!(err.code, 502);
    }

    #[test]
    fn invalid_json_fails_by_default() {
        let err = relay_body(
            "application/json; charset=utf-8",
            Bytes::from_static(b"<html>oops</html>"),
            InvalidJsonPolicy::Fail,
        )
        .unwrap_err();

        assert_eq!(err.code, 502);
        assert!(err.message.contains("invalid JSON"));
    }

    #[test]
    fn invalid_json_can_pass_through() {
        let body = relay_body(
            "application/json",
            Bytes::from_static(b"<html>oops</html>"),
            InvalidJsonPolicy::PassThrough,
        )
        .unwrap();

        assert_eq!(body, Bytes::from_static(b"<html>oops</html>"));
    }

    #[test]
    fn json_keeps_key_order() {
        let body = relay_body(
            "application/json",
            Bytes::from_static(b"{\"z\": 1, \"a\": [true, null], \"m\": \"\xc3\xa9\"}"),
            InvalidJsonPolicy::Fail,
        )
        .unwrap();

        assert_eq!(body, Bytes::from("{\"z\":1,\"a\":[true,null],\"m\":\"é\"}"));
    }

    #[test]
    fn json_with_byte_order_mark_is_re_encoded() {
        let body = relay_body(
            "application/json",
            Bytes::from_static(b"\xEF\xBB\xBF{ \"a\" : [1, 2] }"),
            InvalidJsonPolicy::Fail,
        )
        .unwrap();

        assert_eq!(body, Bytes::from_static(br#"{"a":[1,2]}"#));
    }

    #[test]
    fn byte_order_mark_kept_on_pass_through() {
        let raw = Bytes::from_static(b"\xEF\xBB\xBF<html>");
        let body = relay_body("application/json", raw.clone(), InvalidJsonPolicy::PassThrough).unwrap();

        assert_eq!(body, raw);
    }

    #[test]
    fn media_type_match_is_a_substring_check() {
        let body = relay_body(
            "application/problem+json",
            Bytes::from_static(b"{ }"),
            InvalidJsonPolicy::Fail,
        )
        .unwrap();

        assert_eq!(body, Bytes::from_static(b"{ }"));
    }
}
