//! Catch-all route: unrecognised paths redirect to the canonical destination.

use async_trait::async_trait;
use axum::http::HeaderValue;

use crate::error::GatewayError;
use crate::http::request::GatewayRequest;
use crate::http::response::{BaselineHeaders, GatewayResponse};
use crate::routing::{Handler, RouteParams};

pub struct RedirectHandler {
    baseline: BaselineHeaders,
    location: HeaderValue,
}

impl RedirectHandler {
    pub fn new(redirect_url: &str, baseline: BaselineHeaders) -> Result<Self, GatewayError> {
        let location = HeaderValue::from_str(redirect_url)
            .map_err(|e| GatewayError::Handler(format!("invalid redirect url: {e}")))?;
        Ok(Self { baseline, location })
    }
}

#[async_trait]
impl Handler for RedirectHandler {
    async fn handle(
        &self,
        request: &GatewayRequest,
        _params: &RouteParams,
    ) -> Result<GatewayResponse, GatewayError> {
        tracing::debug!(path = request.url.path(), "Unrecognised path, redirecting");
        Ok(GatewayResponse::redirect(&self.baseline, self.location.clone()))
    }
}
