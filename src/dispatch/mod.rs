//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayRequest
//!     → boundary.rs (catch errors and panics → fixed 500)
//!     → dispatcher.rs (method branch)
//!         GET:     key → lookup → [miss] routes → queue store → reply
//!         HEAD:    reply
//!         OPTIONS: reply
//!         PURGE:   key → invalidate → reply
//!     → GatewayResponse
//! ```
//!
//! # Design Decisions
//! - No retries and no dispatcher-level timeout; a request runs once to
//!   completion or failure
//! - Cache writes never block the response

pub mod boundary;
pub mod dispatcher;

pub use boundary::ErrorBoundary;
pub use dispatcher::{Dispatcher, PURGE};
