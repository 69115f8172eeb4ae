//! In-memory response cache.
//!
//! Honours the stored response's own `cache-control`: `max-age` sets the
//! expiry and `no-store` responses are skipped. Expired entries are removed
//! lazily on lookup and swept when the cache reaches capacity.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::header::CACHE_CONTROL;
use dashmap::DashMap;

use crate::cache::key::CacheKey;
use crate::cache::store::{CacheError, ResponseCache};
use crate::http::response::GatewayResponse;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: GatewayResponse,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Directives of a response's `cache-control` that the store cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoragePolicy {
    pub no_store: bool,
    pub max_age: Option<Duration>,
}

impl StoragePolicy {
    pub fn from_response(response: &GatewayResponse) -> Self {
        let mut policy = Self::default();
        for value in response.headers.get_all(CACHE_CONTROL) {
            let Ok(value) = value.to_str() else { continue };
            for directive in value.split(',').map(str::trim) {
                if directive.eq_ignore_ascii_case("no-store") {
                    policy.no_store = true;
                } else if let Some((name, secs)) = directive.split_once('=') {
                    if name.trim().eq_ignore_ascii_case("max-age") {
                        if let Ok(secs) = secs.trim().trim_matches('"').parse::<u64>() {
                            policy.max_age = Some(Duration::from_secs(secs));
                        }
                    }
                }
            }
        }
        policy
    }
}

/// A process-local `ResponseCache` backed by a concurrent map.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Arc<DashMap<CacheKey, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    /// Number of entries, including ones that expired but were not yet swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| !entry.is_expired(now));
        before - self.inner.len()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<GatewayResponse>, CacheError> {
        let now = Instant::now();
        let expired = match self.inner.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.response.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.inner.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(None)
    }

    async fn store(&self, key: &CacheKey, response: GatewayResponse) -> Result<(), CacheError> {
        let policy = StoragePolicy::from_response(&response);
        if policy.no_store || policy.max_age == Some(Duration::ZERO) {
            tracing::debug!(key = %key, "Response not storable, skipping");
            return Ok(());
        }

        let now = Instant::now();
        if !self.inner.contains_key(key) && self.inner.len() >= self.max_entries {
            let swept = self.sweep_expired(now);
            tracing::debug!(swept, "Swept expired cache entries");
            if self.inner.len() >= self.max_entries {
                return Err(CacheError::Capacity {
                    limit: self.max_entries,
                });
            }
        }

        let entry = CacheEntry {
            response,
            expires_at: policy.max_age.map(|ttl| now + ttl),
        };
        self.inner.insert(key.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.inner.remove(key).is_some())
    }
}
