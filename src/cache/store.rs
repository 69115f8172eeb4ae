//! The response cache collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::key::CacheKey;
use crate::http::response::GatewayResponse;

/// Failure inside the cache subsystem. Never fatal to a request.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache full ({limit} entries)")]
    Capacity { limit: usize },
}

/// Shared key → response store.
///
/// Implementations may be eventually consistent; concurrent stores to the
/// same key are last-write-wins.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Fetch a stored response.
    async fn lookup(&self, key: &CacheKey) -> Result<Option<GatewayResponse>, CacheError>;

    /// Persist a response. The cache owns the value it is given.
    async fn store(&self, key: &CacheKey, response: GatewayResponse) -> Result<(), CacheError>;

    /// Drop an entry. Returns whether anything was removed.
    async fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError>;
}
