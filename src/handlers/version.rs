//! `GET /version`: a status page describing the release and the connection.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::config::BrandingConfig;
use crate::error::GatewayError;
use crate::handlers::pages::VERSION_HTML;
use crate::http::request::GatewayRequest;
use crate::http::response::{BaselineHeaders, GatewayResponse, MAX_AGE_DYNAMIC};
use crate::routing::{Handler, RouteParams};
use crate::template::{render, sanitize_text};

pub struct VersionHandler {
    baseline: BaselineHeaders,
    branding: String,
    release: String,
}

impl VersionHandler {
    pub fn new(branding: &BrandingConfig, baseline: BaselineHeaders) -> Self {
        Self {
            baseline,
            branding: sanitize_text(&branding.name),
            release: sanitize_text(&branding.release),
        }
    }

    fn values(&self, request: &GatewayRequest) -> HashMap<&'static str, String> {
        let client = &request.client;
        let or = |value: &Option<String>, fallback: &str| {
            sanitize_text(value.as_deref().unwrap_or(fallback))
        };
        let ip = request
            .header("x-real-ip")
            .or_else(|| request.header("cf-connecting-ip"))
            .unwrap_or("Unknown IP");
        let user_agent = request.user_agent();
        let user_agent = user_agent.as_deref().unwrap_or("Unknown User Agent");
        let region = client.region.as_ref().or(client.country.as_ref()).cloned();

        HashMap::from([
            ("branding", self.branding.clone()),
            ("release", self.release.clone()),
            ("ip", sanitize_text(ip)),
            ("ua", sanitize_text(user_agent)),
            ("city", or(&client.city, "Unknown City")),
            ("region", or(&region, "Unknown Region")),
            ("country", or(&client.country, "Unknown Country")),
            ("httpversion", or(&client.http_version, "Unknown HTTP Version")),
            ("tlsversion", or(&client.tls_version, "Unknown TLS Version")),
            ("edge", or(&client.edge_name, "??")),
        ])
    }
}

#[async_trait]
impl Handler for VersionHandler {
    async fn handle(
        &self,
        request: &GatewayRequest,
        _params: &RouteParams,
    ) -> Result<GatewayResponse, GatewayError> {
        let body = render(VERSION_HTML, &self.values(request));
        Ok(GatewayResponse::html(StatusCode::OK, &self.baseline, body)
            .cache_control(MAX_AGE_DYNAMIC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method};

    fn handler() -> VersionHandler {
        let branding = BrandingConfig::default();
        VersionHandler::new(&branding, BaselineHeaders::new(&branding, 3600))
    }

    async fn body_of(request: GatewayRequest) -> (GatewayResponse, String) {
        let res = handler().handle(&request, &RouteParams::default()).await.unwrap();
        let body = String::from_utf8(res.body.clone().unwrap().to_vec()).unwrap();
        (res, body)
    }

    #[tokio::test]
    async fn test_version_page_defaults() {
        let req = GatewayRequest::new(Method::GET, "http://e.com/version")
            .unwrap()
            .with_header(header::USER_AGENT, "Mozilla/5.0");
        let (res, body) = body_of(req).await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.headers["cache-control"], "max-age=1");
        assert!(body.contains("Unknown IP"));
        assert!(body.contains("Mozilla/5.0"));
        assert!(body.contains("Unknown Country"));
        assert!(!body.contains("{ip}"));
    }

    #[tokio::test]
    async fn test_version_page_prefers_real_ip_and_escapes_ua() {
        let req = GatewayRequest::new(Method::GET, "http://e.com/version")
            .unwrap()
            .with_header(header::HeaderName::from_static("cf-connecting-ip"), "10.0.0.2")
            .with_header(header::HeaderName::from_static("x-real-ip"), "10.0.0.1")
            .with_header(header::USER_AGENT, "<b>bot</b>");
        let (_, body) = body_of(req).await;

        assert!(body.contains("10.0.0.1"));
        assert!(!body.contains("10.0.0.2"));
        assert!(body.contains("&lt;b&gt;bot&lt;/b&gt;"));
        assert!(!body.contains("<b>bot</b>"));
    }

    #[tokio::test]
    async fn test_region_falls_back_to_country() {
        let mut req = GatewayRequest::new(Method::GET, "http://e.com/version").unwrap();
        req.client.country = Some("NL".into());
        let (_, body) = body_of(req.clone()).await;
        assert!(!body.contains("Unknown Region"));

        req.client.region = Some("North Holland".into());
        let (_, body) = body_of(req).await;
        assert!(body.contains("North Holland"));

        let (_, body) = body_of(GatewayRequest::new(Method::GET, "http://e.com/").unwrap()).await;
        assert!(body.contains("Unknown Region"));
    }
}
