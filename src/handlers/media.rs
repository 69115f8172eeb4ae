//! `GET /api/media/:id`: media metadata lookup against the upstream API.
//!
//! An invalid id is answered locally with a 400 JSON body; upstream failures
//! are returned as errors and end up at the error boundary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::GatewayError;
use crate::http::request::GatewayRequest;
use crate::http::response::{BaselineHeaders, GatewayResponse, MAX_AGE_VALIDATION};
use crate::routing::{Handler, RouteParams};

const MAX_ID_LEN: usize = 64;

/// Outbound media API.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Value, GatewayError>;
}

/// `MediaFetcher` over HTTP. Timeouts belong to the client, not the dispatcher.
#[derive(Clone)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("embed-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &Url) -> Result<Value, GatewayError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus(status));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Serialize)]
struct MediaBody<'a> {
    code: u16,
    id: &'a str,
    media: Value,
}

#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    code: u16,
    message: &'a str,
}

pub struct MediaHandler {
    baseline: BaselineHeaders,
    api_base: Url,
    fetcher: Arc<dyn MediaFetcher>,
}

impl MediaHandler {
    pub fn new(api_base: Url, fetcher: Arc<dyn MediaFetcher>, baseline: BaselineHeaders) -> Self {
        Self {
            baseline,
            api_base,
            fetcher,
        }
    }

    fn media_url(&self, id: &str) -> Result<Url, GatewayError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Handler("media api url cannot be a base".into()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn invalid(&self, message: &str) -> Result<GatewayResponse, GatewayError> {
        let body = ValidationBody { code: 400, message };
        Ok(GatewayResponse::json(StatusCode::BAD_REQUEST, &self.baseline, &body)?
            .cache_control(MAX_AGE_VALIDATION))
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[async_trait]
impl Handler for MediaHandler {
    async fn handle(
        &self,
        request: &GatewayRequest,
        params: &RouteParams,
    ) -> Result<GatewayResponse, GatewayError> {
        let Some(id) = params.get("id") else {
            return self.invalid("missing media id");
        };
        if !is_valid_id(id) {
            return self.invalid("invalid media id");
        }

        let url = self.media_url(id)?;
        tracing::debug!(request_id = request.request_id(), url = %url, "Fetching media");
        let media = self.fetcher.fetch(&url).await?;

        let body = MediaBody { code: 200, id, media };
        Ok(GatewayResponse::json(StatusCode::OK, &self.baseline, &body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrandingConfig;
    use axum::http::Method;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubFetcher {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl MediaFetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<Value, GatewayError> {
            self.seen.lock().unwrap().push(url.to_string());
            if self.fail {
                Err(GatewayError::UpstreamStatus(StatusCode::BAD_GATEWAY))
            } else {
                Ok(serde_json::json!({"title": "clip"}))
            }
        }
    }

    fn handler(fetcher: Arc<StubFetcher>) -> MediaHandler {
        let baseline = BaselineHeaders::new(&BrandingConfig::default(), 3600);
        MediaHandler::new(Url::parse("https://api.example.com/media/").unwrap(), fetcher, baseline)
    }

    fn params(id: &str) -> RouteParams {
        crate::routing::PathPattern::parse("/api/media/:id")
            .unwrap()
            .matches(&format!("/api/media/{id}"))
            .unwrap()
    }

    fn request() -> GatewayRequest {
        GatewayRequest::new(Method::GET, "http://e.com/api/media/x").unwrap()
    }

    #[tokio::test]
    async fn test_fetches_media() {
        let fetcher = Arc::new(StubFetcher::default());
        let res = handler(fetcher.clone()).handle(&request(), &params("Cx_1-a")).await.unwrap();

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.headers["content-type"], "application/json");
        let body: Value = serde_json::from_slice(&res.body.unwrap()).unwrap();
        assert_eq!(body["media"]["title"], "clip");
        assert_eq!(*fetcher.seen.lock().unwrap(), vec!["https://api.example.com/media/Cx_1-a"]);
    }

    #[tokio::test]
    async fn test_invalid_id_is_400_json() {
        let fetcher = Arc::new(StubFetcher::default());
        let res = handler(fetcher.clone()).handle(&request(), &params("bad%20id")).await.unwrap();

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.headers["cache-control"], "max-age=300");
        let body: Value = serde_json::from_slice(&res.body.unwrap()).unwrap();
        assert_eq!(body["code"], 400);
        assert!(fetcher.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_is_400() {
        let res = handler(Arc::new(StubFetcher::default()))
            .handle(&request(), &RouteParams::default())
            .await
            .unwrap();
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let fetcher = Arc::new(StubFetcher {
            fail: true,
            ..Default::default()
        });
        let err = handler(fetcher).handle(&request(), &params("abc")).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamStatus(StatusCode::BAD_GATEWAY)));
    }
}
