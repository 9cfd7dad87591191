//! Cache stores for API responses
//!
//! This module provides the `CacheStore` seam the resolver reads through,
//! with two implementations: a disk-backed store that persists entries as
//! JSON files with expiry timestamps, and an in-memory store. Expired
//! entries are reported as absent, so every lookup past an entry's TTL is
//! a miss.

mod manager;
mod memory;

pub use manager::CacheManager;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Result of a fresh cache read
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
}

/// Key-value store with per-entry TTL
///
/// Implementations must support concurrent reads and writes from
/// independent callers; a write fully replaces any existing entry for the
/// key, and `read` never yields an entry whose expiry has passed.
pub trait CacheStore {
    /// Reads a fresh entry for `key`
    ///
    /// Returns `None` if the entry is absent, expired, or cannot be parsed.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>>;

    /// Writes an entry for `key` that expires `ttl` from now
    fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> std::io::Result<()>;
}
