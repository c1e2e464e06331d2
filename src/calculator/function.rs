//! The calculator served as an edge function.

use crate::calculator::io::{calculate, HtmlSink};
use crate::function::{EdgeError, EdgeFunction, FunctionContext};
use crate::http::{EdgeRequest, EdgeResponse};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Reads `sex`, `height`, `neck`, `waist` and `hip` from the query string or
/// an urlencoded form body and answers with the rendered result fragment, or
/// JSON when the client asks for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyFatFunction;

impl BodyFatFunction {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EdgeFunction for BodyFatFunction {
    async fn fetch(
        &self,
        request: EdgeRequest,
        ctx: &FunctionContext,
    ) -> Result<EdgeResponse, EdgeError> {
        let form = request.form();
        let mut sink = HtmlSink::new();

        let assessment = match calculate(&form, &mut sink) {
            Ok(assessment) => assessment,
            Err(err) => {
                warn!("Rejected calculation [{}]: {}", ctx.request_id, err);
                let message = sink.alert.unwrap_or_else(|| err.to_string());
                return Err(EdgeError::bad_request(message));
            }
        };

        debug!(
            "Body fat {}% ({}) [{}]",
            assessment.percentage, assessment.label, ctx.request_id
        );

        let wants_json = request
            .get_header("accept")
            .is_some_and(|accept| accept.contains("application/json"));
        if wants_json {
            return EdgeResponse::json(&assessment).map_err(|e| EdgeError::new(e.to_string()));
        }

        Ok(EdgeResponse::html(sink.render()))
    }

    fn name(&self) -> &str {
        "bodyfat"
    }
}
