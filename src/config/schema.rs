//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Branding and redirect target.
    pub branding: BrandingConfig,

    /// Response cache behaviour.
    pub cache: CacheConfig,

    /// Upstream media API.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Name of this edge node, shown on the version page.
    pub edge_name: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            edge_name: None,
        }
    }
}

/// Branding used in headers and rendered pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Product name shown on pages.
    pub name: String,

    /// Value of the `x-powered-by` header.
    pub powered_by: String,

    /// Release identifier shown on the version and error pages.
    pub release: String,

    /// Where unrecognised paths are redirected.
    pub redirect_url: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            name: "Embed Gateway".to_string(),
            powered_by: "Foxes".to_string(),
            release: concat!("embed-gateway-", env!("CARGO_PKG_VERSION")).to_string(),
            redirect_url: "https://github.com/".to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Hostnames whose GET requests never read from the cache.
    pub excluded_hosts: Vec<String>,

    /// User-Agent substring identifying the link-preview crawler.
    pub crawler_token: String,

    /// Key-only query parameter appended to crawler cache keys.
    pub crawler_marker: String,

    /// Default `max-age` for responses, in seconds.
    pub default_max_age_secs: u64,

    /// Maximum number of entries held by the in-memory cache.
    pub max_entries: usize,

    /// Capacity of the background write queue.
    pub write_queue: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            excluded_hosts: Vec::new(),
            crawler_token: "Telegram".to_string(),
            crawler_marker: "telegram".to_string(),
            default_max_age_secs: 3600,
            max_entries: 10_000,
            write_queue: 1024,
        }
    }
}

/// Upstream media API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL for media lookups; the media id is appended as a path segment.
    pub media_api_url: String,

    /// Timeout for a single upstream call in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            media_api_url: "http://127.0.0.1:9000/media".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
