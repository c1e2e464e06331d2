//! HTTP server hosting a single edge function.

use crate::function::{EdgeFunction, FunctionContext};
use crate::http::{EdgeRequest, EdgeResponse, Method, StatusCode};
use crate::runtime::{BoxError, ServerConfig};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, warn, Instrument};

const HEALTH_PATH: &str = "/_health";

/// Edge server.
///
/// Every request is handed to the one hosted function; there is no
/// path-based dispatch. With `enable_health` set, `/_health` is answered by
/// the server instead.
pub struct EdgeServer {
    config: ServerConfig,
    function: Arc<dyn EdgeFunction>,
}

impl EdgeServer {
    pub fn new(config: ServerConfig, function: impl EdgeFunction + 'static) -> Self {
        Self {
            config,
            function: Arc::new(function),
        }
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), BoxError> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        self.serve(listener, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve connections from an already bound listener until `shutdown`
    /// resolves. In-flight connections are left to finish on their own tasks.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), BoxError> {
        info!(
            "Serving function '{}' on {}",
            self.function.name(),
            listener.local_addr()?
        );

        tokio::pin!(shutdown);

        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("Shutting down function '{}'", self.function.name());
                    return Ok(());
                }
            };
            let io = TokioIo::new(stream);

            let function = self.function.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let function = function.clone();
                    let config = config.clone();
                    async move { handle_request(req, function, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {:?}", remote_addr, err);
                }
            });
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    function: Arc<dyn EdgeFunction>,
    config: ServerConfig,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request_id = generate_request_id();
    let span = info_span!("request", id = %request_id);

    async move {
        debug!("{} {} from {}", req.method(), req.uri(), remote_addr);

        if config.enable_health && req.uri().path() == HEALTH_PATH {
            return Ok(build_response(EdgeResponse::text("OK")));
        }

        let edge_request = match convert_request(req, &config).await {
            Ok(req) => req,
            Err(response) => return Ok(build_response(response)),
        };

        let ctx = FunctionContext::new(function.name(), &request_id).with_remote_addr(remote_addr);

        match function.fetch(edge_request, &ctx).await {
            Ok(response) => Ok(build_response(response)),
            Err(e) => {
                error!("Function '{}' error: {}", function.name(), e);
                Ok(build_response(e.into()))
            }
        }
    }
    .instrument(span)
    .await
}

/// Convert a hyper request into an [`EdgeRequest`], or the response to send
/// back when the body cannot be accepted.
async fn convert_request(
    req: Request<Incoming>,
    config: &ServerConfig,
) -> Result<EdgeRequest, EdgeResponse> {
    let method = Method::from(req.method());
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let limited = Limited::new(req.into_body(), config.max_body_size);
    let body_bytes = match limited.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!("Rejecting body over {} bytes", config.max_body_size);
            return Err(EdgeResponse::error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large",
            ));
        }
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return Err(EdgeResponse::error(
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", e),
            ));
        }
    };

    Ok(EdgeRequest {
        method,
        url,
        headers,
        body: (!body_bytes.is_empty()).then_some(body_bytes),
    })
}

/// Build a hyper response from an [`EdgeResponse`].
fn build_response(edge_response: EdgeResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(edge_response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            edge_response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = Response::builder().status(status);
    for (name, value) in edge_response.headers {
        builder = builder.header(name, value);
    }

    let body = edge_response.body.unwrap_or_default();
    builder.body(Full::new(body)).unwrap_or_else(|err| {
        error!("Function produced an invalid response: {}", err);
        let mut fallback = Response::new(Full::new(Bytes::from_static(b"Invalid response")));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}
