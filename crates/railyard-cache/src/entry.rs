//! Internal cache entry structure

use std::time::{Duration, SystemTime};

/// Cache entry with expiration
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
	pub(crate) value: Vec<u8>,
	pub(crate) expires_at: Option<SystemTime>,
}

impl CacheEntry {
	pub(crate) fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
		let expires_at = ttl.map(|d| SystemTime::now() + d);
		Self { value, expires_at }
	}

	pub(crate) fn is_expired(&self) -> bool {
		self.expires_at
			.is_some_and(|expires_at| SystemTime::now() > expires_at)
	}

	/// Whole seconds left before expiry, if the entry expires at all.
	pub(crate) fn ttl_seconds(&self) -> Option<u64> {
		self.expires_at.and_then(|expires_at| {
			expires_at
				.duration_since(SystemTime::now())
				.ok()
				.map(|d| d.as_secs())
		})
	}
}
