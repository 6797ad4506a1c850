//! In-process response cache shared by the API clients.
//!
//! One `ResponseCache` is created at startup and handed to every client
//! through its builder. Entries expire at a fixed instant or never; an
//! expired entry is treated as absent and removed on read.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Default maximum number of live entries before eviction kicks in.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// TTL for movie search pages.
pub const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for movie details.
pub const DETAILS_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for movie image listings.
pub const IMAGES_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for daily forecasts.
pub const FORECAST_TTL: Duration = Duration::from_secs(10 * 60);

/// Key identifying one cached upstream response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `search/movie` page. The query is stored lowercased.
    Search {
        /// Lowercased search query.
        query: String,
        /// 1-based page number.
        page: u32,
    },
    /// `movie/{id}`.
    Details(u64),
    /// `movie/{id}/images`.
    Images(u64),
    /// `configuration`.
    Configuration,
    /// Daily forecast for a coordinate pair, each rounded to 6 decimals.
    Forecast {
        /// Latitude formatted with 6 decimals.
        latitude: String,
        /// Longitude formatted with 6 decimals.
        longitude: String,
    },
}

impl CacheKey {
    /// Builds a search key, normalizing the query to lowercase.
    #[must_use]
    pub fn search(query: &str, page: u32) -> Self {
        Self::Search {
            query: query.to_lowercase(),
            page,
        }
    }

    /// Builds a forecast key from raw coordinates.
    #[must_use]
    pub fn forecast(latitude: f64, longitude: f64) -> Self {
        Self::Forecast {
            latitude: format!("{latitude:.6}"),
            longitude: format!("{longitude:.6}"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search { query, page } => write!(f, "tmdb_search::{query}::page::{page}"),
            Self::Details(id) => write!(f, "tmdb_details::{id}"),
            Self::Images(id) => write!(f, "tmdb_images::{id}"),
            Self::Configuration => f.write_str("tmdb_configuration"),
            Self::Forecast {
                latitude,
                longitude,
            } => write!(f, "weather::{latitude}::{longitude}"),
        }
    }
}

/// When a cache entry stops being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Expires at the given instant.
    At(Instant),
    /// Never expires; only eviction pressure or a restart removes it.
    Never,
}

impl Expiry {
    /// Expiry `ttl` from now.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn after(ttl: Duration) -> Self {
        Self::At(Instant::now() + ttl)
    }

    fn is_expired(self, now: Instant) -> bool {
        match self {
            Self::At(deadline) => now >= deadline,
            Self::Never => false,
        }
    }
}

/// A stored value with its insertion time and expiry.
#[derive(Clone)]
pub struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    inserted_at: Instant,
    expiry: Expiry,
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("inserted_at", &self.inserted_at)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Concurrent keyed response cache with per-entry expiry.
///
/// Concurrent misses on the same key may both insert; the last write wins
/// and readers always observe one complete value.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    max_entries: usize,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ResponseCache {
    /// Creates an empty cache holding at most `max_entries` values.
    ///
    /// A `max_entries` of zero is treated as one.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the cached value for `key` if present, unexpired and of type `T`.
    ///
    /// An expired entry is removed and reported as a miss.
    #[must_use]
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let value = {
            let entry = self.entries.get(key)?;
            if entry.expiry.is_expired(now) {
                None
            } else {
                Some(Arc::clone(&entry.value))
            }
        };

        let Some(value) = value else {
            self.entries
                .remove_if(key, |_, entry| entry.expiry.is_expired(now));
            return None;
        };

        value.downcast_ref::<T>().cloned()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert<T>(&self, key: CacheKey, value: T, expiry: Expiry)
    where
        T: Send + Sync + 'static,
    {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.relieve_pressure();
        }

        self.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                inserted_at: Instant::now(),
                expiry,
            },
        );
    }

    /// Removes the entry for `key`, if any.
    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.remove(key);
    }

    /// Number of stored entries, including ones that expired but were not yet read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops expired entries, then the oldest entry if still at capacity.
    fn relieve_pressure(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.expiry.is_expired(now));

        if self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Evicting oldest cache entry");
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_search_key_is_lowercased() {
        // Arrange & Act
        let key = CacheKey::search("The MATRIX", 2);

        // Assert
        assert_eq!(key, CacheKey::search("the matrix", 2));
        assert_eq!(key.to_string(), "tmdb_search::the matrix::page::2");
    }

    #[test]
    fn test_forecast_key_rounds_to_six_decimals() {
        // Arrange & Act
        let key = CacheKey::forecast(-23.550_520_01, -46.633_309);

        // Assert
        assert_eq!(key, CacheKey::forecast(-23.550_520_04, -46.633_309_000_1));
        assert_eq!(key.to_string(), "weather::-23.550520::-46.633309");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_value_before_expiry() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(
            CacheKey::Details(42),
            String::from("value"),
            Expiry::after(Duration::from_secs(60)),
        );

        // Act
        tokio::time::advance(Duration::from_secs(59)).await;
        let hit: Option<String> = cache.get(&CacheKey::Details(42));

        // Assert
        assert_eq!(hit.as_deref(), Some("value"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss_and_removed() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(
            CacheKey::Details(42),
            String::from("value"),
            Expiry::after(Duration::from_secs(60)),
        );

        // Act
        tokio::time::advance(Duration::from_secs(60)).await;
        let hit: Option<String> = cache.get(&CacheKey::Details(42));

        // Assert
        assert!(hit.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_expiry_survives_time() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(CacheKey::Configuration, 7_u32, Expiry::Never);

        // Act
        tokio::time::advance(Duration::from_secs(60 * 60 * 24 * 365)).await;

        // Assert
        assert_eq!(cache.get::<u32>(&CacheKey::Configuration), Some(7));
    }

    #[test]
    fn test_type_mismatch_is_a_miss() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(CacheKey::Images(1), 5_u64, Expiry::Never);

        // Act
        let hit: Option<String> = cache.get(&CacheKey::Images(1));

        // Assert
        assert!(hit.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites_existing_key() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(CacheKey::Details(1), 1_u32, Expiry::Never);

        // Act
        cache.insert(CacheKey::Details(1), 2_u32, Expiry::Never);

        // Assert
        assert_eq!(cache.get::<u32>(&CacheKey::Details(1)), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest_entry() {
        // Arrange
        let cache = ResponseCache::new(2);
        cache.insert(CacheKey::Configuration, 1_u32, Expiry::Never);
        tokio::time::advance(Duration::from_millis(1)).await;
        cache.insert(CacheKey::Details(1), 2_u32, Expiry::Never);
        tokio::time::advance(Duration::from_millis(1)).await;

        // Act
        cache.insert(CacheKey::Details(2), 3_u32, Expiry::Never);

        // Assert
        assert_eq!(cache.len(), 2);
        assert!(cache.get::<u32>(&CacheKey::Configuration).is_none());
        assert_eq!(cache.get::<u32>(&CacheKey::Details(1)), Some(2));
        assert_eq!(cache.get::<u32>(&CacheKey::Details(2)), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_purges_expired_before_evicting_live() {
        // Arrange
        let cache = ResponseCache::new(2);
        cache.insert(CacheKey::Configuration, 1_u32, Expiry::Never);
        tokio::time::advance(Duration::from_millis(1)).await;
        cache.insert(
            CacheKey::Details(1),
            2_u32,
            Expiry::after(Duration::from_secs(1)),
        );
        tokio::time::advance(Duration::from_secs(2)).await;

        // Act
        cache.insert(CacheKey::Details(2), 3_u32, Expiry::Never);

        // Assert
        assert_eq!(cache.get::<u32>(&CacheKey::Configuration), Some(1));
        assert_eq!(cache.get::<u32>(&CacheKey::Details(2)), Some(3));
    }

    #[test]
    fn test_invalidate_removes_entry() {
        // Arrange
        let cache = ResponseCache::new(8);
        cache.insert(CacheKey::Configuration, 1_u32, Expiry::Never);

        // Act
        cache.invalidate(&CacheKey::Configuration);

        // Assert
        assert!(cache.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_leave_readable_value() {
        // Arrange
        let cache = Arc::new(ResponseCache::new(8));
        let key = CacheKey::search("dune", 1);

        // Act
        let writers: Vec<_> = (0..16_u32)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let key = key.clone();
                tokio::spawn(async move {
                    for _ in 0..32 {
                        let expiry = Expiry::after(Duration::from_secs(60));
                        cache.insert(key.clone(), vec![i; 64], expiry);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for handle in writers {
            handle.await.unwrap();
        }

        // Assert
        let value: Vec<u32> = cache.get(&key).unwrap();
        assert_eq!(value.len(), 64);
        assert!(value.iter().all(|v| *v == value[0]));
    }
}
