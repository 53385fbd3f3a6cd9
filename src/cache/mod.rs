//! Cache Module
//!
//! Durable file-backed cache slots plus request counters.

mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use stats::{CacheStats, StatsSnapshot};
pub use store::FileStore;

// == Public Constants ==
/// File extension of every slot file
pub const SLOT_EXTENSION: &str = "jpg";
