//! Per-request method policy and cache orchestration.
//!
//! | Method  | Cache                         | Routes | Reply                     |
//! |---------|-------------------------------|--------|---------------------------|
//! | GET     | lookup (unless host excluded) | on miss| cached or fresh response  |
//! |         | background store on success   |        |                           |
//! | HEAD    | -                             | -      | 200, baseline headers     |
//! | OPTIONS | -                             | -      | 204, `allow` only         |
//! | PURGE   | invalidate                    | -      | 200                       |
//! | other   | -                             | -      | 405                       |

use std::sync::Arc;

use axum::http::header::ALLOW;
use axum::http::StatusCode;

use crate::cache::{CacheKey, CacheKeyNormalizer, CacheWriter, ExclusionSet, ResponseCache};
use crate::config::CacheConfig;
use crate::error::GatewayError;
use crate::http::request::GatewayRequest;
use crate::http::response::{BaselineHeaders, GatewayResponse};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Extension method understood by the gateway for cache invalidation.
pub const PURGE: &str = "PURGE";

pub struct Dispatcher {
    routes: Arc<RouteTable>,
    cache: Arc<dyn ResponseCache>,
    writer: CacheWriter,
    keys: CacheKeyNormalizer,
    excluded: ExclusionSet,
    baseline: BaselineHeaders,
}

impl Dispatcher {
    /// Build a dispatcher and spawn its cache writer on the current runtime.
    pub fn new(
        routes: RouteTable,
        cache: Arc<dyn ResponseCache>,
        settings: &CacheConfig,
        baseline: BaselineHeaders,
    ) -> Self {
        let (writer, _handle) = CacheWriter::spawn(cache.clone(), settings.write_queue);
        let excluded = ExclusionSet::new(&settings.excluded_hosts);
        tracing::info!(
            routes = routes.len(),
            excluded_hosts = excluded.len(),
            crawler_token = %settings.crawler_token,
            "Dispatcher ready"
        );

        Self {
            routes: Arc::new(routes),
            cache,
            writer,
            keys: CacheKeyNormalizer::new(&settings.crawler_token, &settings.crawler_marker),
            excluded,
            baseline,
        }
    }

    /// The cache key this request reads from and writes to.
    pub fn cache_key(&self, request: &GatewayRequest) -> CacheKey {
        self.keys.key_for(&request.url, request.user_agent().as_deref())
    }

    /// Produce exactly one response for the request.
    ///
    /// Only route failures are returned as errors; cache failures are
    /// absorbed here.
    pub async fn dispatch(
        &self,
        request: &GatewayRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        match request.method.as_str() {
            "GET" => self.get(request).await,
            "HEAD" => Ok(GatewayResponse::with_baseline(StatusCode::OK, &self.baseline)),
            "OPTIONS" => Ok(
                GatewayResponse::empty(StatusCode::NO_CONTENT).header(ALLOW, self.baseline.allow())
            ),
            PURGE => {
                self.purge(request).await;
                Ok(GatewayResponse::empty(StatusCode::OK))
            }
            _ => Ok(GatewayResponse::empty(StatusCode::METHOD_NOT_ALLOWED)),
        }
    }

    /// Wait for every queued cache write to settle.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    async fn get(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let request_id = request.request_id();
        let key = self.cache_key(request);

        if self.excluded.contains(&request.url) {
            tracing::debug!(request_id, key = %key, "Host excluded from cache reads");
            metrics::record_cache_lookup("bypass");
        } else {
            match self.cache.lookup(&key).await {
                Ok(Some(cached)) => {
                    tracing::debug!(request_id, key = %key, "Cache hit");
                    metrics::record_cache_lookup("hit");
                    return Ok(cached);
                }
                Ok(None) => {
                    tracing::debug!(request_id, key = %key, "Cache miss");
                    metrics::record_cache_lookup("miss");
                }
                Err(e) => {
                    tracing::warn!(
                        request_id,
                        key = %key,
                        error = %e,
                        "Cache lookup failed, treating as miss"
                    );
                    metrics::record_cache_lookup("error");
                }
            }
        }

        let response = self.routes.handle(request).await?;

        // Same key value as the lookup above; the store gets its own copy.
        self.writer.enqueue(key, response.clone());
        Ok(response)
    }

    async fn purge(&self, request: &GatewayRequest) {
        let request_id = request.request_id();
        let key = self.cache_key(request);
        match self.cache.invalidate(&key).await {
            Ok(removed) => {
                tracing::info!(request_id, key = %key, removed, "Purged cache entry");
                metrics::record_cache_purge(if removed { "removed" } else { "absent" });
            }
            Err(e) => {
                tracing::warn!(request_id, key = %key, error = %e, "Cache purge failed");
                metrics::record_cache_purge("error");
            }
        }
    }
}
