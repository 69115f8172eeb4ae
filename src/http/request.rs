//! Inbound request model.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Convert the axum request into an immutable `GatewayRequest`
//! - Rebuild the absolute URL (scheme + host + path + query) used for cache keys
//! - Capture client/connection metadata for the version page

use std::borrow::Cow;

use axum::body::Body;
use axum::http::uri::{Authority, Uri};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Version};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;

use crate::error::GatewayError;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Produces UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Connection and geo hints about the client.
///
/// Everything is optional; pages fall back to "Unknown ..." text.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub http_version: Option<String>,
    pub tls_version: Option<String>,
    pub edge_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// An inbound request as seen by the dispatcher. Immutable once built.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub client: ClientInfo,
}

impl GatewayRequest {
    /// Build a request directly, mostly useful in tests.
    pub fn new(method: Method, url: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: HeaderMap::new(),
            client: ClientInfo::default(),
        })
    }

    /// Add a header, builder style.
    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Convert an axum request. The body is dropped: no gateway route reads it.
    ///
    /// The URL is the request-line path and query under a scheme and a bare
    /// `host[:port]` authority. Header values never contribute path segments.
    pub fn from_http(
        request: &Request<Body>,
        edge_name: Option<&str>,
    ) -> Result<Self, GatewayError> {
        let uri = request.uri();
        let headers = request.headers();

        let scheme = match uri.scheme_str() {
            Some(scheme) => known_scheme(scheme)
                .ok_or_else(|| GatewayError::Authority(format!("unsupported scheme '{scheme}'")))?,
            None => header_str(headers, "x-forwarded-proto")
                .and_then(known_scheme)
                .unwrap_or("http"),
        };
        let authority = request_authority(uri, headers)?;

        let mut url = Url::parse(&format!("{scheme}://{authority}/"))?;
        url.set_path(uri.path());
        url.set_query(uri.query());

        let client = ClientInfo {
            http_version: Some(version_label(request.version()).to_string()),
            tls_version: None,
            edge_name: edge_name.map(str::to_string),
            country: header_str(headers, "cf-ipcountry").map(str::to_string),
            city: header_str(headers, "cf-ipcity").map(str::to_string),
            region: header_str(headers, "cf-region").map(str::to_string),
        };

        Ok(Self {
            method: request.method().clone(),
            url,
            headers: headers.clone(),
            client,
        })
    }

    /// First value of a header, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    /// The `User-Agent` header, decoded lossily so non-ASCII bytes keep it visible.
    pub fn user_agent(&self) -> Option<Cow<'_, str>> {
        self.headers
            .get(header::USER_AGENT)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
    }

    /// The correlation ID set by the request-id layer.
    pub fn request_id(&self) -> &str {
        self.header(X_REQUEST_ID).unwrap_or("unknown")
    }
}

fn known_scheme(scheme: &str) -> Option<&'static str> {
    match scheme {
        "http" => Some("http"),
        "https" => Some("https"),
        _ => None,
    }
}

/// The request-line authority, else the `Host` header, else `localhost`.
/// Only a bare `host[:port]` is accepted.
fn request_authority(uri: &Uri, headers: &HeaderMap) -> Result<Authority, GatewayError> {
    let authority = match (uri.authority(), headers.get(header::HOST)) {
        (Some(authority), _) => authority.clone(),
        (None, Some(host)) => Authority::try_from(host.as_bytes())
            .map_err(|e| GatewayError::Authority(format!("bad host header: {e}")))?,
        (None, None) => Authority::from_static("localhost"),
    };
    if authority.as_str().contains('@') {
        return Err(GatewayError::Authority(format!(
            "userinfo not allowed in '{authority}'"
        )));
    }
    Ok(authority)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "Unknown HTTP Version",
    }
}
