//! Read-through weather resolution
//!
//! Ties the cache store and the API client together: a resolve call answers
//! from a fresh cache entry when one exists, otherwise issues a single
//! fetch, caches the result for an hour, and returns it. Errors are never
//! cached, so a failed resolution is retried on the next call.

use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::cache::CacheStore;
use crate::data::{FetchError, OpenWeatherClient, Unit, WeatherObservation};

/// How long a successful observation stays fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Derives the cache key for a `(location, unit)` pair
///
/// The location is trimmed and lowercased first, so `"Tokyo"`, `" tokyo "`
/// and `"TOKYO"` share one entry; the unit is part of the hashed input, so
/// metric and imperial lookups never collide. The key is a hex-encoded
/// SHA-256 digest: deterministic across restarts and filesystem-safe.
pub fn cache_key(location: &str, unit: Unit) -> String {
    let mut hasher = Sha256::new();
    hasher.update(location.trim().to_lowercase());
    hasher.update("|");
    hasher.update(unit.as_query());
    format!("weather_{:x}", hasher.finalize())
}

/// Resolves weather observations through a TTL cache
///
/// All collaborators are injected: the HTTP client, the cache store, and
/// the API credential. The resolver holds no state of its own beyond them
/// and no lock across the network call, so independent callers may resolve
/// concurrently. Two simultaneous misses on one key may both fetch; both
/// writes carry the same TTL window, so the last writer wins harmlessly.
#[derive(Debug)]
pub struct WeatherResolver<S> {
    client: OpenWeatherClient,
    store: S,
    api_key: String,
    ttl: Duration,
}

impl<S: CacheStore> WeatherResolver<S> {
    /// Creates a resolver with the default one-hour TTL
    pub fn new(client: OpenWeatherClient, store: S, api_key: impl Into<String>) -> Self {
        Self {
            client,
            store,
            api_key: api_key.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Overrides the cache TTL (used by tests)
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolves the current weather for a city
    ///
    /// A fresh cache entry is returned without any network traffic. On a
    /// miss or an expired entry, exactly one GET is issued; a success is
    /// written back with the TTL and returned, while any failure is
    /// returned uncached. With no credential configured, this returns
    /// `FetchError::MissingCredential` before touching cache or network.
    ///
    /// # Errors
    /// Returns a `FetchError` as described in the error taxonomy; every
    /// variant leaves the cache untouched.
    pub async fn resolve(
        &self,
        location: &str,
        unit: Unit,
    ) -> Result<WeatherObservation, FetchError> {
        if self.api_key.trim().is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let key = cache_key(location, unit);

        if let Some(cached) = self.store.read::<WeatherObservation>(&key) {
            tracing::debug!(location, cached_at = %cached.cached_at, "cache hit");
            return Ok(cached.data);
        }

        tracing::debug!(location, ?unit, "cache miss, fetching");
        let observation = self.client.fetch_current(location, unit, &self.api_key).await?;

        if let Err(e) = self.store.write(&key, &observation, self.ttl) {
            // A failed write costs an extra fetch next time, nothing more
            tracing::warn!(location, error = %e, "failed to write cache entry");
        }

        Ok(observation)
    }
}
