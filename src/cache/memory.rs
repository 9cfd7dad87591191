//! In-memory cache store
//!
//! A process-local `CacheStore` backed by a mutex-guarded map. Values are
//! held as `serde_json::Value` so the store stays type-agnostic, matching
//! the disk store's JSON representation. Used by tests and by callers that
//! have no writable cache directory.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{CacheStore, CachedData};

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Mutex-guarded in-memory key-value store with per-entry TTL
///
/// The lock is held only for the duration of a read or write, never across
/// any I/O, so independent callers can resolve concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        match self.entries.lock() {
            Ok(entries) => entries.values().filter(|e| e.expires_at >= now).count(),
            Err(_) => 0,
        }
    }

    /// Returns true if the store holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;

        if Utc::now() > entry.expires_at {
            return None;
        }

        let data = serde_json::from_value(entry.value.clone()).ok()?;
        Some(CachedData {
            data,
            cached_at: entry.cached_at,
        })
    }

    fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> std::io::Result<()> {
        let value = serde_json::to_value(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let now = Utc::now();
        let entry = Entry {
            value,
            cached_at: now,
            expires_at: now + ttl,
        };

        let mut entries = self
            .entries
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "cache lock poisoned"))?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }
}
