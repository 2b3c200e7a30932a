//! Time-boxed JSON cache over a [`KeyValueStore`].
//!
//! The cache never fails: a missing, corrupt, expired or unreadable entry is
//! a miss, and a write that the backend rejects is dropped after logging.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fmt::Debug, sync::Arc};

use crate::{error::StorageError, storage::KeyValueStore};

/// Bumped whenever the stored entry format changes, orphaning old entries.
pub const SCHEMA_PREFIX: &str = "wn_cache_v1::";

/// Entries older than this at read time are treated as absent.
pub const CACHE_TTL_MINUTES: i64 = 15;

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// What is stored under a cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Cache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock, ttl: Duration::minutes(CACHE_TTL_MINUTES) }
    }

    /// Composite key for `raw` within `namespace`, e.g. `wn_cache_v1::geo:london`.
    pub fn key(namespace: &str, raw: &str) -> String {
        format!("{SCHEMA_PREFIX}{namespace}:{raw}").to_lowercase()
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                return None;
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(key, error = %err, "discarding unreadable cache entry");
                return None;
            }
        };

        let age_ms = self.clock.now().timestamp_millis() - entry.timestamp;
        if age_ms > self.ttl.num_milliseconds() {
            tracing::debug!(key, age_ms, "cache entry expired");
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                tracing::debug!(key, "cache hit");
                Some(data)
            }
            Err(err) => {
                tracing::debug!(key, error = %err, "cache entry has unexpected shape");
                None
            }
        }
    }

    pub fn write<T: Serialize>(&self, key: &str, data: &T) {
        let entry = match serde_json::to_value(data) {
            Ok(data) => CacheEntry { timestamp: self.clock.now().timestamp_millis(), data },
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize cache payload");
                return;
            }
        };

        let result = serde_json::to_string(&entry)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(key, &raw));

        if let Err(err) = result {
            tracing::warn!(key, error = %err, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn cache_with_clock() -> (Cache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));
        let cache = Cache::with_clock(store.clone(), clock.clone());
        (cache, store, clock)
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn key_is_versioned_and_case_insensitive() {
        assert_eq!(Cache::key("geo", "London"), "wn_cache_v1::geo:london");
        assert_eq!(Cache::key("geo", "LONDON"), Cache::key("geo", "london"));
        assert_ne!(Cache::key("geo", "london"), Cache::key("weather", "london"));
    }

    #[test]
    fn read_returns_written_payload_before_ttl() {
        let (cache, _, clock) = cache_with_clock();
        let payload = json!([{ "id": 1, "name": "London" }]);

        cache.write("k", &payload);
        clock.advance(Duration::minutes(15));

        assert_eq!(cache.read::<serde_json::Value>("k"), Some(payload));
    }

    #[test]
    fn read_after_ttl_is_a_miss() {
        let (cache, store, clock) = cache_with_clock();

        cache.write("k", &json!({ "a": 1 }));
        clock.advance(Duration::minutes(15) + Duration::milliseconds(1));

        assert_eq!(cache.read::<serde_json::Value>("k"), None);
        // Expiry is lazy; nothing is swept.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let (cache, store, _) = cache_with_clock();
        store.set("k", "{not json").unwrap();

        assert_eq!(cache.read::<serde_json::Value>("k"), None);
    }

    #[test]
    fn payload_of_wrong_shape_is_a_miss() {
        let (cache, _, _) = cache_with_clock();
        cache.write("k", &json!({ "a": 1 }));

        assert_eq!(cache.read::<Vec<String>>("k"), None);
    }

    #[test]
    fn stored_entry_carries_write_timestamp() {
        let (cache, store, _) = cache_with_clock();
        cache.write("k", &json!("v"));

        let raw = store.get("k").unwrap().unwrap();
        let entry: CacheEntry = serde_json::from_str(&raw).unwrap();

        assert_eq!(entry.timestamp, start().timestamp_millis());
        assert_eq!(entry.data, json!("v"));
    }

    #[test]
    fn failing_backend_is_absorbed() {
        let cache = Cache::new(Arc::new(BrokenStore));

        cache.write("k", &json!(1));
        assert_eq!(cache.read::<serde_json::Value>("k"), None);
    }

    #[test]
    fn quota_exceeded_write_is_dropped() {
        let store = Arc::new(MemoryStore::with_capacity(1));
        let cache = Cache::new(store.clone());

        cache.write("a", &json!(1));
        cache.write("b", &json!(2));

        assert_eq!(cache.read::<i32>("a"), Some(1));
        assert_eq!(cache.read::<i32>("b"), None);
    }
}
