//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! GET request (method, path)
//!     → router.rs (ordered scan of bindings)
//!     → matcher.rs (segment-wise pattern match, bind :params)
//!     → matched handler, or the fallback handler
//!
//! Route compilation (at startup):
//!     (method, pattern, handler) bindings
//!     → PathPattern::parse
//!     → frozen RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::{PathPattern, PatternError, RouteParams};
pub use router::{Handler, RouteBinding, RouteTable};
