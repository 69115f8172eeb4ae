//! Error types for the request pipeline.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure raised while producing a response.
///
/// Anything that reaches the error boundary as a `GatewayError` becomes the
/// fixed 500 page; the detail only goes to the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request url could not be built: {0}")]
    Url(#[from] url::ParseError),

    #[error("rejected request authority: {0}")]
    Authority(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    #[error("malformed upstream payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid route pattern: {0}")]
    Route(#[from] crate::routing::PatternError),

    #[error("handler failed: {0}")]
    Handler(String),
}
