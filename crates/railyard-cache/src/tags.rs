//! Cache tags functionality

use crate::cache_trait::Cache;
use parking_lot::RwLock;
use railyard_core::exception::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Tagged cache trait
///
/// Extends the base cache interface with tag-based invalidation, so a group
/// of entries can be purged without knowing their keys.
pub trait TaggedCache: Send + Sync {
	/// Set a value with associated tags
	fn set_with_tags<T>(
		&self,
		key: &str,
		value: &T,
		ttl: Option<Duration>,
		tags: &[&str],
	) -> Result<()>
	where
		T: Serialize + ?Sized;

	/// Get tags associated with a key
	fn get_tags(&self, key: &str) -> Vec<String>;

	/// Invalidate all entries with a specific tag
	fn invalidate_tag(&self, tag: &str) -> Result<()>;

	/// Invalidate all entries with any of the specified tags
	fn invalidate_tags(&self, tags: &[&str]) -> Result<()> {
		for tag in tags {
			self.invalidate_tag(tag)?;
		}
		Ok(())
	}

	/// Get all keys associated with a tag
	fn get_keys_for_tag(&self, tag: &str) -> Vec<String>;

	/// Get a value from the cache (delegates to underlying cache)
	fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned;

	/// Delete a value from the cache (delegates to underlying cache)
	fn delete(&self, key: &str) -> Result<()>;
}

/// Tagged cache wrapper
///
/// Wraps a standard cache implementation and keeps a two-way tag index next
/// to it.
///
/// # Examples
///
/// ```
/// use railyard_cache::{InMemoryCache, TaggedCache, TaggedCacheWrapper};
/// use std::sync::Arc;
///
/// let tagged = TaggedCacheWrapper::new(Arc::new(InMemoryCache::new()));
/// tagged.set_with_tags("router.routers", &"forward", None, &["system"]).unwrap();
/// tagged.set_with_tags("router.reverse", &"reverse", None, &["system"]).unwrap();
/// tagged.set_with_tags("menu", &"items", None, &["layout"]).unwrap();
///
/// tagged.invalidate_tag("system").unwrap();
///
/// let forward: Option<String> = tagged.get("router.routers").unwrap();
/// let menu: Option<String> = tagged.get("menu").unwrap();
/// assert_eq!(forward, None);
/// assert_eq!(menu, Some("items".to_string()));
/// ```
pub struct TaggedCacheWrapper<C: Cache> {
	cache: Arc<C>,
	tag_index: RwLock<TagIndex>,
}

#[derive(Default)]
struct TagIndex {
	// tag -> set of keys
	tag_to_keys: HashMap<String, HashSet<String>>,
	// key -> set of tags
	key_to_tags: HashMap<String, HashSet<String>>,
}

impl TagIndex {
	fn add(&mut self, key: &str, tags: &[&str]) {
		for tag in tags {
			self.tag_to_keys
				.entry(tag.to_string())
				.or_default()
				.insert(key.to_string());
			self.key_to_tags
				.entry(key.to_string())
				.or_default()
				.insert(tag.to_string());
		}
	}

	fn remove_key(&mut self, key: &str) {
		if let Some(tags) = self.key_to_tags.remove(key) {
			for tag in tags {
				if let Some(keys) = self.tag_to_keys.get_mut(&tag) {
					keys.remove(key);
					if keys.is_empty() {
						self.tag_to_keys.remove(&tag);
					}
				}
			}
		}
	}
}

impl<C: Cache> TaggedCacheWrapper<C> {
	/// Create a new tagged cache wrapper
	pub fn new(cache: Arc<C>) -> Self {
		Self {
			cache,
			tag_index: RwLock::new(TagIndex::default()),
		}
	}

	/// The wrapped backend.
	pub fn inner(&self) -> &C {
		&self.cache
	}
}

impl<C: Cache> TaggedCache for TaggedCacheWrapper<C> {
	fn set_with_tags<T>(
		&self,
		key: &str,
		value: &T,
		ttl: Option<Duration>,
		tags: &[&str],
	) -> Result<()>
	where
		T: Serialize + ?Sized,
	{
		self.cache.set(key, value, ttl)?;
		let mut index = self.tag_index.write();
		// Re-tagging replaces the previous tag set
		index.remove_key(key);
		index.add(key, tags);
		Ok(())
	}

	fn get_tags(&self, key: &str) -> Vec<String> {
		self.tag_index
			.read()
			.key_to_tags
			.get(key)
			.map(|tags| tags.iter().cloned().collect())
			.unwrap_or_default()
	}

	fn invalidate_tag(&self, tag: &str) -> Result<()> {
		let keys: Vec<String> = self
			.tag_index
			.read()
			.tag_to_keys
			.get(tag)
			.map(|keys| keys.iter().cloned().collect())
			.unwrap_or_default();

		for key in &keys {
			self.cache.delete(key)?;
		}

		let mut index = self.tag_index.write();
		for key in &keys {
			index.remove_key(key);
		}
		tracing::debug!(tag, purged = keys.len(), "invalidated cache tag");
		Ok(())
	}

	fn get_keys_for_tag(&self, tag: &str) -> Vec<String> {
		self.tag_index
			.read()
			.tag_to_keys
			.get(tag)
			.map(|keys| keys.iter().cloned().collect())
			.unwrap_or_default()
	}

	fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.cache.get(key)
	}

	fn delete(&self, key: &str) -> Result<()> {
		self.cache.delete(key)?;
		self.tag_index.write().remove_key(key);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::InMemoryCache;
	use rstest::{fixture, rstest};

	#[fixture]
	fn tagged() -> TaggedCacheWrapper<InMemoryCache> {
		TaggedCacheWrapper::new(Arc::new(InMemoryCache::new()))
	}

	#[rstest]
	fn test_invalidate_tag_removes_only_tagged_keys(tagged: TaggedCacheWrapper<InMemoryCache>) {
		tagged
			.set_with_tags("a", &1, None, &["system", "routes"])
			.unwrap();
		tagged.set_with_tags("b", &2, None, &["system"]).unwrap();
		tagged.set_with_tags("c", &3, None, &["views"]).unwrap();

		tagged.invalidate_tag("system").unwrap();

		assert_eq!(tagged.get::<i32>("a").unwrap(), None);
		assert_eq!(tagged.get::<i32>("b").unwrap(), None);
		assert_eq!(tagged.get::<i32>("c").unwrap(), Some(3));
		// "a" also disappears from its other tags
		assert!(tagged.get_keys_for_tag("routes").is_empty());
		assert!(tagged.get_tags("a").is_empty());
	}

	#[rstest]
	fn test_retagging_replaces_tags(tagged: TaggedCacheWrapper<InMemoryCache>) {
		tagged.set_with_tags("a", &1, None, &["old"]).unwrap();
		tagged.set_with_tags("a", &2, None, &["new"]).unwrap();

		assert_eq!(tagged.get_tags("a"), vec!["new".to_string()]);
		assert!(tagged.get_keys_for_tag("old").is_empty());
	}

	#[rstest]
	fn test_delete_cleans_index(tagged: TaggedCacheWrapper<InMemoryCache>) {
		tagged.set_with_tags("a", &1, None, &["system"]).unwrap();
		tagged.delete("a").unwrap();

		assert!(tagged.get_keys_for_tag("system").is_empty());
		assert!(!tagged.inner().has_key("a").unwrap());
	}

	#[rstest]
	fn test_invalidate_tags(tagged: TaggedCacheWrapper<InMemoryCache>) {
		tagged.set_with_tags("a", &1, None, &["x"]).unwrap();
		tagged.set_with_tags("b", &2, None, &["y"]).unwrap();

		tagged.invalidate_tags(&["x", "y"]).unwrap();

		assert_eq!(tagged.inner().list_keys().len(), 0);
	}

	#[rstest]
	fn test_invalidate_unknown_tag_is_noop(tagged: TaggedCacheWrapper<InMemoryCache>) {
		tagged.set_with_tags("a", &1, None, &["x"]).unwrap();
		tagged.invalidate_tag("missing").unwrap();
		assert_eq!(tagged.get::<i32>("a").unwrap(), Some(1));
	}
}
