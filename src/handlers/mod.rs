//! Leaf route handlers and the default route table.

pub mod fallback;
pub mod media;
pub mod pages;
pub mod version;

use std::sync::Arc;

use url::Url;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::response::BaselineHeaders;
use crate::routing::RouteTable;

pub use fallback::RedirectHandler;
pub use media::{HttpMediaFetcher, MediaFetcher, MediaHandler};
pub use version::VersionHandler;

/// Build the gateway's routes:
///
/// - `GET /version`
/// - `GET /api/media/:id`
/// - everything else redirects to `branding.redirect_url`
pub fn default_routes(
    config: &GatewayConfig,
    baseline: &BaselineHeaders,
    fetcher: Arc<dyn MediaFetcher>,
) -> Result<RouteTable, GatewayError> {
    let fallback = RedirectHandler::new(&config.branding.redirect_url, baseline.clone())?;
    let media_base = Url::parse(&config.upstream.media_api_url)?;

    let routes = RouteTable::new(fallback)
        .get("/version", VersionHandler::new(&config.branding, baseline.clone()))?
        .get("/api/media/:id", MediaHandler::new(media_base, fetcher, baseline.clone()))?;
    Ok(routes)
}
