//! The outermost error boundary.
//!
//! Every request future runs inside `ErrorBoundary::run`. Returned errors and
//! panics alike become the fixed 500 page with a one-second cache lifetime.
//! The failure detail is logged here and nowhere else, and never reaches the
//! client.

use std::any::Any;
use std::collections::HashMap;
use std::error::Error as _;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use futures_util::FutureExt;

use crate::config::BrandingConfig;
use crate::error::GatewayError;
use crate::handlers::pages::ERROR_HTML;
use crate::http::response::{BaselineHeaders, GatewayResponse, MAX_AGE_DYNAMIC};
use crate::observability::metrics;
use crate::template::{render, sanitize_text};

pub struct ErrorBoundary {
    error_page: GatewayResponse,
}

impl ErrorBoundary {
    pub fn new(branding: &BrandingConfig, baseline: &BaselineHeaders) -> Self {
        let values = HashMap::from([
            ("branding", sanitize_text(&branding.name)),
            ("release", sanitize_text(&branding.release)),
        ]);
        let error_page = GatewayResponse::html(
            StatusCode::INTERNAL_SERVER_ERROR,
            baseline,
            render(ERROR_HTML, &values),
        )
        .header(CONTENT_TYPE, HeaderValue::from_static("text/html"))
        .cache_control(MAX_AGE_DYNAMIC);

        Self { error_page }
    }

    /// The fixed response served for any failure.
    pub fn error_response(&self) -> GatewayResponse {
        self.error_page.clone()
    }

    /// Drive `pipeline` to completion, converting any failure into the error page.
    pub async fn run<F>(&self, request_id: &str, pipeline: F) -> GatewayResponse
    where
        F: Future<Output = Result<GatewayResponse, GatewayError>>,
    {
        match AssertUnwindSafe(pipeline).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::error!(
                    request_id,
                    error = %err,
                    chain = %error_chain(&err),
                    "Request failed"
                );
                metrics::record_failure("error");
                self.error_response()
            }
            Err(panic) => {
                tracing::error!(
                    request_id,
                    panic = panic_message(panic.as_ref()),
                    "Request handler panicked"
                );
                metrics::record_failure("panic");
                self.error_response()
            }
        }
    }
}

fn error_chain(err: &GatewayError) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary() -> ErrorBoundary {
        let branding = BrandingConfig::default();
        ErrorBoundary::new(&branding, &BaselineHeaders::new(&branding, 3600))
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let res = boundary()
            .run("t", async { Ok(GatewayResponse::empty(StatusCode::ACCEPTED)) })
            .await;
        assert_eq!(res.status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_error_becomes_fixed_500() {
        let boundary = boundary();
        let res = boundary
            .run("t", async { Err(GatewayError::Handler("secret detail".into())) })
            .await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.headers["cache-control"], "max-age=1");
        assert_eq!(res.headers["content-type"], "text/html");
        assert_eq!(res, boundary.error_response());
        let body = String::from_utf8(res.body.unwrap().to_vec()).unwrap();
        assert!(body.contains("Owie"));
        assert!(!body.contains("secret detail"));
    }

    #[tokio::test]
    #[allow(unreachable_code)]
    async fn test_panic_is_contained() {
        let boundary = boundary();
        let res = boundary
            .run("t", async {
                tokio::task::yield_now().await;
                panic!("boom");
                Ok(GatewayResponse::empty(StatusCode::OK))
            })
            .await;

        assert_eq!(res, boundary.error_response());
    }
}
