//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → request.rs (GatewayRequest: absolute URL, headers, client info)
//!     → [dispatch layer decides cache/route/reply]
//!     → response.rs (GatewayResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientInfo, GatewayRequest, X_REQUEST_ID};
pub use response::{BaselineHeaders, GatewayResponse};
pub use server::HttpServer;
