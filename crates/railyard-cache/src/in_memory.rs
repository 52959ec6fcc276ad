//! In-memory cache implementation

use crate::cache_trait::Cache;
use crate::entry::CacheEntry;
use crate::statistics::{CacheEntryInfo, CacheStatistics};
use parking_lot::RwLock;
use railyard_core::exception::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// In-memory cache backend.
///
/// Cloning shares the underlying store, so one instance can be handed to
/// several gateways.
#[derive(Clone, Default)]
pub struct InMemoryCache {
	store: Arc<RwLock<HashMap<String, CacheEntry>>>,
	default_ttl: Option<Duration>,
	hits: Arc<AtomicU64>,
	misses: Arc<AtomicU64>,
}

impl InMemoryCache {
	/// Create a new in-memory cache with no default TTL.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a default TTL applied when `set` is called with `None`.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_cache::{Cache, InMemoryCache};
	/// use std::time::Duration;
	///
	/// let cache = InMemoryCache::new().with_default_ttl(Duration::from_secs(300));
	/// cache.set("key", &"value", None).unwrap();
	///
	/// let info = cache.inspect_entry("key").unwrap();
	/// assert!(info.has_expiry);
	/// ```
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = Some(ttl);
		self
	}

	/// Drop expired entries.
	pub fn cleanup_expired(&self) {
		self.store.write().retain(|_, entry| !entry.is_expired());
	}

	/// Snapshot of hit/miss counters and occupancy.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_cache::{Cache, InMemoryCache};
	///
	/// let cache = InMemoryCache::new();
	/// cache.set("key1", &"value1", None).unwrap();
	///
	/// let _: Option<String> = cache.get("key1").unwrap(); // Hit
	/// let _: Option<String> = cache.get("key2").unwrap(); // Miss
	///
	/// let stats = cache.get_statistics();
	/// assert_eq!(stats.hits, 1);
	/// assert_eq!(stats.misses, 1);
	/// assert_eq!(stats.entry_count, 1);
	/// ```
	pub fn get_statistics(&self) -> CacheStatistics {
		let store = self.store.read();
		let hits = self.hits.load(Ordering::Relaxed);
		let misses = self.misses.load(Ordering::Relaxed);

		CacheStatistics {
			hits,
			misses,
			total_requests: hits + misses,
			entry_count: store.len() as u64,
			memory_usage: store.values().map(|entry| entry.value.len() as u64).sum(),
		}
	}

	/// All keys currently stored, including expired entries not yet cleaned up.
	pub fn list_keys(&self) -> Vec<String> {
		self.store.read().keys().cloned().collect()
	}

	/// Inspect a single entry without counting it as a hit or miss.
	pub fn inspect_entry(&self, key: &str) -> Option<CacheEntryInfo> {
		self.store.read().get(key).map(|entry| CacheEntryInfo {
			key: key.to_string(),
			size: entry.value.len(),
			has_expiry: entry.expires_at.is_some(),
			ttl_seconds: entry.ttl_seconds(),
		})
	}
}

impl Cache for InMemoryCache {
	fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let store = self.store.read();

		match store.get(key) {
			Some(entry) if !entry.is_expired() => {
				self.hits.fetch_add(1, Ordering::Relaxed);
				let value = serde_json::from_slice(&entry.value)
					.map_err(|e| Error::Serialization(e.to_string()))?;
				Ok(Some(value))
			}
			_ => {
				self.misses.fetch_add(1, Ordering::Relaxed);
				Ok(None)
			}
		}
	}

	fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
	where
		T: Serialize + ?Sized,
	{
		let serialized =
			serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))?;
		let entry = CacheEntry::new(serialized, ttl.or(self.default_ttl));

		self.store.write().insert(key.to_string(), entry);
		Ok(())
	}

	fn delete(&self, key: &str) -> Result<()> {
		self.store.write().remove(key);
		Ok(())
	}

	fn has_key(&self, key: &str) -> Result<bool> {
		Ok(self
			.store
			.read()
			.get(key)
			.is_some_and(|entry| !entry.is_expired()))
	}

	fn clear(&self) -> Result<()> {
		self.store.write().clear();
		Ok(())
	}
}
