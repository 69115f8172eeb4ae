//! Edge embedding gateway.
//!
//! Every request passes through an error boundary into the dispatcher, which
//! applies per-method policy (GET/HEAD/OPTIONS/PURGE) around a shared
//! response cache and a small route table.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod template;

pub use config::GatewayConfig;
pub use dispatch::{Dispatcher, ErrorBoundary};
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
