//! Shared fakes and helpers for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::Value;
use url::Url;

use embed_gateway::cache::{CacheError, CacheKey, MemoryCache, ResponseCache};
use embed_gateway::config::GatewayConfig;
use embed_gateway::handlers::MediaFetcher;
use embed_gateway::http::GatewayResponse;
use embed_gateway::GatewayError;

pub const HOST: &str = "embed.example.com";
pub const API_HOST: &str = "api.example.com";
pub const REDIRECT_URL: &str = "https://github.com/example/embed-gateway";
pub const TELEGRAM_UA: &str = "TelegramBot (like TwitterBot)";
pub const BROWSER_UA: &str = "Mozilla/5.0";

/// Config used by every test: one excluded host and a known redirect target.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.branding.redirect_url = REDIRECT_URL.into();
    config.cache.excluded_hosts = vec![API_HOST.into()];
    config.upstream.media_api_url = "http://media.invalid/media".into();
    config
}

/// A memory cache that counts every call.
pub struct CountingCache {
    inner: MemoryCache,
    pub lookups: AtomicUsize,
    pub hits: AtomicUsize,
    pub stores: AtomicUsize,
    pub invalidations: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCache::new(1000),
            lookups: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            stores: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.lookups() + self.stores() + self.invalidations()
    }
}

#[async_trait]
impl ResponseCache for CountingCache {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<GatewayResponse>, CacheError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let found = self.inner.lookup(key).await?;
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }

    async fn store(&self, key: &CacheKey, response: GatewayResponse) -> Result<(), CacheError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(key, response).await
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.inner.invalidate(key).await
    }
}

/// A cache whose every operation fails.
pub struct UnavailableCache;

#[async_trait]
impl ResponseCache for UnavailableCache {
    async fn lookup(&self, _: &CacheKey) -> Result<Option<GatewayResponse>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn store(&self, _: &CacheKey, _: GatewayResponse) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn invalidate(&self, _: &CacheKey) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

/// How the stub media API behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    Ok,
    Fail,
    Panic,
}

/// Stub media API counting fetches.
pub struct StubMedia {
    mode: MediaMode,
    pub fetches: AtomicUsize,
}

impl StubMedia {
    pub fn new(mode: MediaMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaFetcher for StubMedia {
    async fn fetch(&self, url: &Url) -> Result<Value, GatewayError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        match self.mode {
            MediaMode::Ok => Ok(serde_json::json!({ "url": url.as_str(), "fetch": n })),
            MediaMode::Fail => Err(GatewayError::UpstreamStatus(StatusCode::SERVICE_UNAVAILABLE)),
            MediaMode::Panic => panic!("media stub exploded"),
        }
    }
}

/// Build a request for `HOST` with an optional User-Agent.
pub fn request(method: &str, path: &str, user_agent: Option<&str>) -> Request<Body> {
    request_for(HOST, method, path, user_agent)
}

pub fn request_for(
    host: &str,
    method: &str,
    path: &str,
    user_agent: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path).header("host", host);
    if let Some(ua) = user_agent {
        builder = builder.header("user-agent", ua);
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
