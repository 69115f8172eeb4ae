//! Route lookup and dispatch.
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks)
//! - O(n) scan in declaration order; first match wins
//! - Exactly one fallback handler, which receives every unmatched request

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;

use crate::error::GatewayError;
use crate::http::request::GatewayRequest;
use crate::http::response::GatewayResponse;
use crate::routing::matcher::{PathPattern, PatternError, RouteParams};

/// A route handler: produces a response or fails.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        request: &GatewayRequest,
        params: &RouteParams,
    ) -> Result<GatewayResponse, GatewayError>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(GatewayRequest, RouteParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GatewayResponse, GatewayError>> + Send + 'static,
{
    async fn handle(
        &self,
        request: &GatewayRequest,
        params: &RouteParams,
    ) -> Result<GatewayResponse, GatewayError> {
        (self)(request.clone(), params.clone()).await
    }
}

/// A (method, pattern) → handler binding.
pub struct RouteBinding {
    method: Method,
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteBinding")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Ordered route table with a mandatory fallback.
pub struct RouteTable {
    routes: Vec<RouteBinding>,
    fallback: Arc<dyn Handler>,
}

impl RouteTable {
    pub fn new(fallback: impl Handler + 'static) -> Self {
        Self {
            routes: Vec::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Append a binding. Earlier bindings take precedence.
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<Self, PatternError> {
        let pattern = PathPattern::parse(pattern)?;
        tracing::debug!(method = %method, pattern = pattern.as_str(), "Route registered");
        self.routes.push(RouteBinding {
            method,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    pub fn get(self, pattern: &str, handler: impl Handler + 'static) -> Result<Self, PatternError> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the first binding for the request, or the fallback.
    pub fn lookup(&self, method: &Method, path: &str) -> (Arc<dyn Handler>, RouteParams) {
        self.routes
            .iter()
            .filter(|binding| binding.method == *method)
            .find_map(|binding| {
                binding
                    .pattern
                    .matches(path)
                    .map(|params| (binding.handler.clone(), params))
            })
            .unwrap_or_else(|| (self.fallback.clone(), RouteParams::default()))
    }

    /// Run the matching handler for a request.
    pub async fn handle(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let (handler, params) = self.lookup(&request.method, request.url.path());
        handler.handle(request, &params).await
    }
}
