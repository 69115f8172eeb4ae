//! Response model and baseline headers.
//!
//! # Design Decisions
//! - Bodies are fully buffered `Bytes`, so a response clone shares no stream
//!   state with the original and can be stored while the original is sent
//! - Baseline headers are built once from config and applied per response;
//!   individual routes override `cache-control` and `content-type` as needed

use axum::body::{Body, Bytes};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::config::BrandingConfig;

/// Methods advertised in the `allow` header.
pub const ALLOWED_METHODS: &str = "OPTIONS, GET, PURGE, HEAD";

/// `cache-control` for dynamic pages and the error page.
pub const MAX_AGE_DYNAMIC: &str = "max-age=1";

/// `cache-control` for validation-error JSON.
pub const MAX_AGE_VALIDATION: &str = "max-age=300";

/// Headers present on every generated response unless overridden.
#[derive(Debug, Clone)]
pub struct BaselineHeaders {
    headers: HeaderMap,
}

impl BaselineHeaders {
    /// Build the baseline set from branding and the default cache lifetime.
    pub fn new(branding: &BrandingConfig, default_max_age_secs: u64) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html;charset=UTF-8"),
        );
        if let Ok(value) = HeaderValue::from_str(&branding.powered_by) {
            headers.insert(HeaderName::from_static("x-powered-by"), value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={default_max_age_secs}")) {
            headers.insert(header::CACHE_CONTROL, value);
        }
        Self { headers }
    }

    /// The `allow` header value.
    pub fn allow(&self) -> HeaderValue {
        self.headers
            .get(header::ALLOW)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(ALLOWED_METHODS))
    }

    pub fn as_map(&self) -> &HeaderMap {
        &self.headers
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl GatewayResponse {
    /// An empty response with no headers.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// An empty response carrying the baseline headers.
    pub fn with_baseline(status: StatusCode, baseline: &BaselineHeaders) -> Self {
        Self {
            status,
            headers: baseline.as_map().clone(),
            body: None,
        }
    }

    /// An HTML page with the baseline headers.
    pub fn html(status: StatusCode, baseline: &BaselineHeaders, body: impl Into<Bytes>) -> Self {
        Self::with_baseline(status, baseline).body(body)
    }

    /// A JSON document with the baseline headers.
    pub fn json<T: Serialize>(
        status: StatusCode,
        baseline: &BaselineHeaders,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::with_baseline(status, baseline)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body))
    }

    /// A 302 redirect.
    pub fn redirect(baseline: &BaselineHeaders, location: HeaderValue) -> Self {
        Self::with_baseline(StatusCode::FOUND, baseline).header(header::LOCATION, location)
    }

    /// Set (replace) a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override `cache-control`.
    pub fn cache_control(self, value: &'static str) -> Self {
        self.header(header::CACHE_CONTROL, HeaderValue::from_static(value))
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(self.body.map(Body::from).unwrap_or_else(Body::empty));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
