//! Read-through caching of routing tables.

use crate::table::{ReverseSnapshot, RouteSpec, RoutingTables};
use parking_lot::Mutex;
use railyard_cache::{TaggedCache, prepare_key};
use railyard_core::exception::Result;
use std::sync::Arc;

/// Cache key of the forward table.
pub const ROUTES_KEY: &str = "router.routers";
/// Cache key of the reverse table.
pub const REVERSE_KEY: &str = "router.reverse";
/// Tag shared by both keys.
pub const SYSTEM_TAG: &str = "system";

/// Stores and loads [`RoutingTables`] through a tagged cache.
///
/// Both tables are written without expiry under the `system` tag, so they
/// live until that tag is invalidated.
///
/// # Examples
///
/// ```
/// use railyard_cache::{InMemoryCache, TaggedCacheWrapper};
/// use railyard_urls::{ControllerRoutes, RouteCacheGateway, RoutingTables, StaticControllerSource};
/// use std::sync::Arc;
///
/// let cache = Arc::new(TaggedCacheWrapper::new(Arc::new(InMemoryCache::new())));
/// let gateway = RouteCacheGateway::new(cache);
/// let source = StaticControllerSource::new()
///     .with_controller(ControllerRoutes::new("pages", "about").route("/about"));
///
/// assert!(gateway.load().is_none());
/// let tables = gateway.load_or_build(|| RoutingTables::build(&source));
/// assert_eq!(gateway.load().as_ref(), Some(tables.as_ref()));
/// ```
pub struct RouteCacheGateway<C: TaggedCache> {
	cache: Arc<C>,
	build_lock: Mutex<()>,
}

impl<C: TaggedCache> RouteCacheGateway<C> {
	pub fn new(cache: Arc<C>) -> Self {
		Self {
			cache,
			build_lock: Mutex::new(()),
		}
	}

	/// The underlying cache.
	pub fn cache(&self) -> &C {
		&self.cache
	}

	/// Loads cached tables.
	///
	/// Returns `None` on a miss. A cache error or a stored route that no
	/// longer compiles is logged and also reported as a miss.
	pub fn load(&self) -> Option<RoutingTables> {
		let routes = self.read::<Vec<RouteSpec>>(ROUTES_KEY)?;
		let reverse = self.read::<ReverseSnapshot>(REVERSE_KEY)?;

		match RoutingTables::from_snapshot(routes, reverse) {
			Ok(tables) => {
				tracing::trace!(routes = tables.forward().len(), "routing tables cache hit");
				Some(tables)
			}
			Err(e) => {
				tracing::warn!(error = %e, "cached routing tables are unusable, rebuilding");
				None
			}
		}
	}

	fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
		match self.cache.get::<T>(&prepare_key(key)) {
			Ok(value) => value,
			Err(e) => {
				tracing::warn!(key, error = %e, "routing tables cache read failed");
				None
			}
		}
	}

	/// Writes both tables under the `system` tag, without expiry.
	///
	/// # Errors
	///
	/// Returns the cache error when either write fails.
	pub fn store(&self, tables: &RoutingTables) -> Result<()> {
		self.cache.set_with_tags(
			&prepare_key(ROUTES_KEY),
			&tables.route_specs(),
			None,
			&[SYSTEM_TAG],
		)?;
		self.cache.set_with_tags(
			&prepare_key(REVERSE_KEY),
			&tables.reverse_snapshot(),
			None,
			&[SYSTEM_TAG],
		)?;
		Ok(())
	}

	/// Drops every entry tagged `system`, the routing tables included.
	///
	/// # Errors
	///
	/// Returns the cache error when a delete fails.
	pub fn invalidate(&self) -> Result<()> {
		self.cache.invalidate_tag(SYSTEM_TAG)
	}

	/// Returns cached tables, or builds, stores and returns new ones.
	///
	/// Concurrent callers that miss at the same time build once: the cache is
	/// checked again after taking the build lock. A failed store is logged and
	/// the freshly built tables are returned anyway.
	pub fn load_or_build<F>(&self, build: F) -> Arc<RoutingTables>
	where
		F: FnOnce() -> RoutingTables,
	{
		if let Some(tables) = self.load() {
			return Arc::new(tables);
		}

		let _guard = self.build_lock.lock();
		if let Some(tables) = self.load() {
			return Arc::new(tables);
		}

		tracing::debug!("routing tables cache miss, building");
		let tables = build();
		if let Err(e) = self.store(&tables) {
			tracing::warn!(error = %e, "failed to store routing tables");
		}
		Arc::new(tables)
	}
}
