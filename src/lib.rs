//! # Railyard
//!
//! Module/controller URL routing with cached route tables and reverse URL
//! generation.
//!
//! Controllers declare route templates like `/blog/{$id}`. Railyard compiles
//! them into a forward table for resolving request paths and a reverse table
//! for building URLs. Paths that no declared route matches are read as
//! `/module/controller/key/value/...`, so every request resolves to a target.
//!
//! ## Feature Flags
//!
//! - `minimal` - Routing engine only
//! - `full` (default) - Routing plus the settings and cache crates
//! - `urls` - [`urls`]: route tables, resolution, URL building
//! - `conf` - [`conf`]: layered router settings (TOML, environment)
//! - `cache` - [`cache`]: cache backends and tag-based invalidation
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "full")]
//! # fn main() {
//! use railyard::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = RouterSettings::default();
//! let source = StaticControllerSource::new().with_controller(
//!     ControllerRoutes::new("blog", "read")
//!         .route("/blog/{$id}")
//!         .param("id", ParamType::Int),
//! );
//! let gateway = RouteCacheGateway::new(Arc::new(TaggedCacheWrapper::new(Arc::new(
//!     InMemoryCache::new(),
//! ))));
//! let router = Router::load(&settings, &gateway, &source);
//!
//! let request = RouteRequest::builder().uri("/blog/42?ref=home").build().unwrap();
//! let session = router.process(request);
//! assert_eq!(session.module(), "blog");
//! assert_eq!(session.param("id"), Some("42"));
//! assert_eq!(session.param("ref"), Some("home"));
//!
//! let url = router.url("blog", "read", &url_params! { "id" => 7 }).unwrap();
//! assert_eq!(url, "/blog/7");
//! # }
//! # #[cfg(not(feature = "full"))]
//! # fn main() {}
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use railyard_core::{Error, Result, exception, request};

#[cfg(feature = "urls")]
#[cfg_attr(docsrs, doc(cfg(feature = "urls")))]
pub use railyard_urls as urls;

#[cfg(feature = "urls")]
#[cfg_attr(docsrs, doc(cfg(feature = "urls")))]
pub use railyard_urls::url_params;

#[cfg(feature = "conf")]
#[cfg_attr(docsrs, doc(cfg(feature = "conf")))]
pub use railyard_conf as conf;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub use railyard_cache as cache;

/// Commonly used types.
pub mod prelude {
	pub use railyard_core::{Error, RequestMethod, RouteRequest};

	#[cfg(feature = "urls")]
	pub use railyard_urls::{
		ControllerRoutes, ControllerSource, InventoryControllerSource, MethodMap, MethodTarget,
		ParamType, ParamValue, Resolution, RouteCacheGateway, Router, RouterSession, RoutingTables,
		StaticControllerSource, UrlParams, url_params,
	};

	#[cfg(feature = "conf")]
	pub use railyard_conf::{EnvSource, RouterSettings, SettingsBuilder, TomlFileSource};

	#[cfg(feature = "cache")]
	pub use railyard_cache::{Cache, InMemoryCache, TaggedCache, TaggedCacheWrapper};
}
