//! # sheetview-cache
//!
//! Best-effort, time-bounded memoization of pages and row counts.
//!
//! Entries are stored as `{"storedAt": <epoch ms>, "value": ...}` JSON.
//! Expiry is checked lazily on read and expired entries stay in the store
//! until the next write for the same key. Storage failures never reach the
//! caller: a failed read is a miss and a failed write is a no-op.
//!
//! ```
//! use sheetview_cache::{Cache, ManualClock};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new(0));
//! let cache = Cache::memory().with_clock(clock.clone());
//! cache.set("rows", &42_u32);
//!
//! clock.advance(999);
//! assert_eq!(cache.get::<u32>("rows", Duration::from_secs(1)), Some(42));
//! clock.advance(1);
//! assert_eq!(cache.get::<u32>("rows", Duration::from_secs(1)), None);
//! ```

mod clock;
mod error;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
pub use key::{CacheKey, CacheSubject};
pub use store::{CacheStore, FileStore, MemoryStore, NullStore};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Serialized form of a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    #[serde(rename = "storedAt")]
    pub stored_at: i64,
    pub value: T,
}

/// Cache front end over a [`CacheStore`] and a [`Clock`].
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStore::new(dir)))
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NullStore))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Value stored under `key` if it was written less than `max_age` ago.
    pub fn get<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let raw = match self.store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, "cache read failed: {e}");
                return None;
            }
        };

        let entry: Entry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, "ignoring corrupt cache entry: {e}");
                return None;
            }
        };

        let age = self.clock.now_millis().saturating_sub(entry.stored_at);
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        // An entry stamped in the future means the clock moved back
        if (0..max_age_ms).contains(&age) {
            debug!(key, age_ms = age, "cache hit");
            Some(entry.value)
        } else {
            debug!(key, age_ms = age, "cache entry expired");
            None
        }
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let entry = Entry {
            stored_at: self.clock.now_millis(),
            value,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, "cache entry not serializable: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(key, raw) {
            warn!(key, "cache write failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let entry = Entry {
            stored_at: 1_700_000_000_000,
            value: 12,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"storedAt":1700000000000,"value":12}"#
        );
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let cache = Cache::disabled();
        cache.set("k", &"v");
        assert_eq!(cache.get::<String>("k", Duration::from_secs(60)), None);
    }
}
