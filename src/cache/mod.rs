//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! GET request
//!     → key.rs (URL + crawler marker → CacheKey, exclusion check)
//!     → store.rs (ResponseCache::lookup)
//!     → on miss: route handler, then writer.rs (queued ResponseCache::store)
//!
//! PURGE request
//!     → key.rs → store.rs (ResponseCache::invalidate)
//! ```
//!
//! # Design Decisions
//! - The cache is injected as `Arc<dyn ResponseCache>`; nothing is global
//! - Cache failures are logged and treated as a miss or a no-op
//! - Concurrent writes to one key are tolerated: last write wins

pub mod key;
pub mod memory;
pub mod store;
pub mod writer;

pub use key::{CacheKey, CacheKeyNormalizer, ExclusionSet};
pub use memory::MemoryCache;
pub use store::{CacheError, ResponseCache};
pub use writer::CacheWriter;
