//! # Railyard Cache
//!
//! A small synchronous cache layer. Values are stored as JSON bytes so any
//! `Serialize` type can be cached, and [`TaggedCacheWrapper`] adds bulk
//! invalidation by tag on top of any [`Cache`] backend.
//!
//! ```
//! use railyard_cache::{InMemoryCache, TaggedCache, TaggedCacheWrapper};
//! use std::sync::Arc;
//!
//! let cache = TaggedCacheWrapper::new(Arc::new(InMemoryCache::new()));
//! cache.set_with_tags("router.routers", &vec!["/about"], None, &["system"]).unwrap();
//!
//! cache.invalidate_tag("system").unwrap();
//! let value: Option<Vec<String>> = cache.get("router.routers").unwrap();
//! assert!(value.is_none());
//! ```

mod cache_trait;
mod entry;
mod in_memory;
mod statistics;
mod tags;

pub use cache_trait::{Cache, prepare_key};
pub use in_memory::InMemoryCache;
pub use statistics::{CacheEntryInfo, CacheStatistics};
pub use tags::{TaggedCache, TaggedCacheWrapper};
