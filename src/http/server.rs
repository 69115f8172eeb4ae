//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router feeding every method and path to the gateway
//! - Wire up middleware (tracing, request ID)
//! - Run each request through the error boundary and the dispatcher
//! - Serve until shutdown, then flush pending cache writes

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cache::{MemoryCache, ResponseCache};
use crate::config::GatewayConfig;
use crate::dispatch::{Dispatcher, ErrorBoundary};
use crate::error::GatewayError;
use crate::handlers::{default_routes, HttpMediaFetcher, MediaFetcher};
use crate::http::request::{GatewayRequest, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::BaselineHeaders;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub boundary: Arc<ErrorBoundary>,
    pub edge_name: Option<Arc<str>>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Create a server with the in-memory cache and the HTTP media client.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let cache = Arc::new(MemoryCache::new(config.cache.max_entries));
        let fetcher = Arc::new(HttpMediaFetcher::new(Duration::from_secs(
            config.upstream.timeout_secs,
        ))?);
        Self::with_collaborators(config, cache, fetcher)
    }

    /// Create a server with explicit cache and media collaborators.
    pub fn with_collaborators(
        config: GatewayConfig,
        cache: Arc<dyn ResponseCache>,
        fetcher: Arc<dyn MediaFetcher>,
    ) -> Result<Self, GatewayError> {
        let baseline = BaselineHeaders::new(&config.branding, config.cache.default_max_age_secs);
        let routes = default_routes(&config, &baseline, fetcher)?;
        let dispatcher = Arc::new(Dispatcher::new(routes, cache, &config.cache, baseline.clone()));

        let state = AppState {
            dispatcher: dispatcher.clone(),
            boundary: Arc::new(ErrorBoundary::new(&config.branding, &baseline)),
            edge_name: config.listener.edge_name.as_deref().map(Arc::from),
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            dispatcher,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run top to bottom: the ID is set before the trace span opens
    /// and copied onto the response last.
    fn build_router(state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id));

        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// A clone of the router, for serving or driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then flush queued cache writes.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        self.dispatcher.flush().await;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request, whatever its method or path, lands here.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        "Dispatching request"
    );

    // Convert before awaiting: the axum body is not `Sync`.
    let converted = GatewayRequest::from_http(&request, state.edge_name.as_deref());
    drop(request);

    let response = state
        .boundary
        .run(&request_id, async {
            let request = converted?;
            state.dispatcher.dispatch(&request).await
        })
        .await;

    metrics::record_request(&method, response.status.as_u16(), start);
    response.into_response()
}
