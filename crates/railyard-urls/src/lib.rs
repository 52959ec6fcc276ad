//! # Railyard URLs
//!
//! Module/controller routing for Railyard applications.
//!
//! Controllers declare route templates such as `/blog/{$id}`. The declarations
//! are compiled into [`RoutingTables`]: an ordered forward table used to
//! resolve request paths and a reverse table used to build URLs. Paths no
//! declared route matches are read positionally as
//! `/module/controller/key/value/...`, so every path resolves.
//!
//! ## Resolving a request
//!
//! ```
//! use railyard_core::RouteRequest;
//! use railyard_urls::{ControllerRoutes, Resolution, Router, RoutingTables};
//! use std::sync::Arc;
//!
//! let tables = RoutingTables::from_controllers(vec![
//!     ControllerRoutes::new("pages", "about").route("/about"),
//! ]);
//! let router = Router::new(Arc::new(tables));
//!
//! let session = router.process(RouteRequest::builder().uri("/users/edit/id/42").build().unwrap());
//! assert_eq!(session.resolution(), Some(Resolution::Fallback));
//! assert_eq!(session.module(), "users");
//! assert_eq!(session.param("id"), Some("42"));
//! ```
//!
//! ## Caching tables
//!
//! Building tables compiles every route regex. [`RouteCacheGateway`] keeps
//! the result in a [`railyard_cache::TaggedCache`] so it is built once per
//! deployment rather than once per process.

pub mod cache_gateway;
pub mod discovery;
mod encoding;
pub mod fallback;
pub mod method_map;
pub mod param_type;
pub mod pattern;
pub mod router;
pub mod session;
pub mod table;
pub mod template;
pub mod url_builder;

pub use cache_gateway::{REVERSE_KEY, ROUTES_KEY, RouteCacheGateway, SYSTEM_TAG};
pub use discovery::{
	ControllerRegistration, ControllerRoutes, ControllerSource, InventoryControllerSource,
	RouteDeclaration, StaticControllerSource,
};
pub use fallback::FallbackRoute;
pub use method_map::{MethodMap, MethodTarget};
pub use param_type::ParamType;
pub use pattern::CompiledPattern;
pub use router::Router;
pub use session::{CONTROLLER_PARAM, MODULE_PARAM, Resolution, RouterSession};
pub use table::{ReverseEntry, ReverseSnapshot, ReverseSpec, RouteEntry, RouteSpec, RoutingTables};
pub use template::{RouteTemplate, Segment};
pub use url_builder::{ParamValue, UrlBuilder, UrlParams, build_query};
