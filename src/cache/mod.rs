//! Cache Module
//!
//! Expiring key-value cache with lazy eviction and JSON snapshot persistence.

mod entry;
mod file;
pub mod keys;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use file::{CacheFile, Snapshot};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
