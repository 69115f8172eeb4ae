//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Every problem is
//! reported, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Err(e) = Url::parse(&config.branding.redirect_url) {
        errors.push(ValidationError::new("branding.redirect_url", e.to_string()));
    }

    if let Err(e) = Url::parse(&config.upstream.media_api_url) {
        errors.push(ValidationError::new("upstream.media_api_url", e.to_string()));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }

    let cache = &config.cache;
    if cache.crawler_token.trim().is_empty() {
        errors.push(ValidationError::new("cache.crawler_token", "must not be empty"));
    }
    if cache.crawler_marker.is_empty()
        || !cache
            .crawler_marker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(ValidationError::new(
            "cache.crawler_marker",
            "must be a non-empty token of [A-Za-z0-9_-]",
        ));
    }
    if cache.max_entries == 0 {
        errors.push(ValidationError::new("cache.max_entries", "must be greater than 0"));
    }
    if cache.write_queue == 0 {
        errors.push(ValidationError::new("cache.write_queue", "must be greater than 0"));
    }
    for host in &cache.excluded_hosts {
        if host.trim().is_empty() || host.contains('/') || host.contains(':') {
            errors.push(ValidationError::new(
                "cache.excluded_hosts",
                format!("'{host}' is not a bare hostname"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
