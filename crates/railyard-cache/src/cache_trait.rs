//! The cache backend contract.

use railyard_core::exception::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Key/value cache backend.
///
/// A `ttl` of `None` means the entry never expires on its own; it stays
/// until deleted, cleared or invalidated through a tag.
pub trait Cache: Send + Sync {
	/// Get a value, or `None` on a miss or an expired entry.
	fn get<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned;

	/// Store a value.
	fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
	where
		T: Serialize + ?Sized;

	/// Remove a value. Removing an absent key is not an error.
	fn delete(&self, key: &str) -> Result<()>;

	/// Whether a live entry exists for `key`.
	fn has_key(&self, key: &str) -> Result<bool>;

	/// Remove every entry.
	fn clear(&self) -> Result<()>;
}

/// Normalizes a cache key so it is safe for every backend.
///
/// Characters that some stores treat as separators (`-`, `/`, `\`, `@`, `:`)
/// are replaced with `_`.
///
/// # Examples
///
/// ```
/// use railyard_cache::prepare_key;
///
/// assert_eq!(prepare_key("router.routers"), "router.routers");
/// assert_eq!(prepare_key("users:detail/by-id@v1"), "users_detail_by_id_v1");
/// ```
pub fn prepare_key(key: &str) -> String {
	key.chars()
		.map(|c| match c {
			'-' | '/' | '\\' | '@' | ':' => '_',
			other => other,
		})
		.collect()
}
