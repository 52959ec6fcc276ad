//! The router: shared tables plus naming defaults.

use crate::cache_gateway::RouteCacheGateway;
use crate::discovery::ControllerSource;
use crate::session::RouterSession;
use crate::table::RoutingTables;
use crate::url_builder::{UrlBuilder, UrlParams};
use railyard_cache::TaggedCache;
use railyard_conf::RouterSettings;
use railyard_core::exception::Result;
use railyard_core::request::RouteRequest;
use std::sync::Arc;

/// Resolves requests and builds URLs against one set of routing tables.
///
/// A router is cheap to share: the tables sit behind an `Arc` and each
/// request gets its own [`RouterSession`].
///
/// # Examples
///
/// ```
/// use railyard_core::RouteRequest;
/// use railyard_urls::{ControllerRoutes, Resolution, Router, RoutingTables, url_params};
/// use std::sync::Arc;
///
/// let tables = RoutingTables::from_controllers(vec![
///     ControllerRoutes::new("blog", "read")
///         .route("/blog/{$id}")
///         .param("id", "int"),
/// ]);
/// let router = Router::new(Arc::new(tables));
///
/// let request = RouteRequest::builder().uri("/blog/42").build().unwrap();
/// let mut session = router.session(request);
/// assert_eq!(session.process(), Resolution::Custom);
/// assert_eq!(session.param("id"), Some("42"));
///
/// assert_eq!(router.url("blog", "read", &url_params! { "id" => 7 }).unwrap(), "/blog/7");
/// ```
#[derive(Debug, Clone)]
pub struct Router {
	tables: Arc<RoutingTables>,
	base_url: String,
	default_module: String,
	default_controller: String,
	error_module: String,
	error_controller: String,
}

impl Router {
	/// Router with default settings.
	pub fn new(tables: Arc<RoutingTables>) -> Self {
		Self::from_settings(&RouterSettings::default(), tables)
	}

	pub fn from_settings(settings: &RouterSettings, tables: Arc<RoutingTables>) -> Self {
		Self {
			tables,
			base_url: normalize_base_url(&settings.base_url),
			default_module: settings.default_module.clone(),
			default_controller: settings.default_controller.clone(),
			error_module: settings.error_module.clone(),
			error_controller: settings.error_controller.clone(),
		}
	}

	/// Builds a router, reading its tables through `gateway`.
	///
	/// With caching disabled in `settings` the tables are built from `source`
	/// directly and the cache is left alone.
	pub fn load<C: TaggedCache>(
		settings: &RouterSettings,
		gateway: &RouteCacheGateway<C>,
		source: &dyn ControllerSource,
	) -> Self {
		let tables = if settings.cache_enabled {
			gateway.load_or_build(|| RoutingTables::build(source))
		} else {
			Arc::new(RoutingTables::build(source))
		};
		Self::from_settings(settings, tables)
	}

	pub fn tables(&self) -> &Arc<RoutingTables> {
		&self.tables
	}

	/// Starts resolving `request`.
	pub fn session(&self, request: RouteRequest) -> RouterSession<'_> {
		RouterSession::new(self, request)
	}

	/// Resolves `request` and returns the processed session.
	pub fn process(&self, request: RouteRequest) -> RouterSession<'_> {
		let mut session = self.session(request);
		session.process();
		session
	}

	/// URL path for `module`/`controller`, prefixed with the base URL.
	///
	/// # Errors
	///
	/// Returns [`railyard_core::Error::UnresolvableTarget`] when `module` or
	/// `controller` is empty.
	pub fn url(&self, module: &str, controller: &str, params: &UrlParams) -> Result<String> {
		UrlBuilder::new(
			&self.tables,
			&self.base_url,
			&self.default_module,
			&self.default_controller,
		)
		.build(module, controller, params)
	}

	/// Like [`Router::url`], taking a missing module or controller from the
	/// one `request` was resolved to.
	///
	/// # Errors
	///
	/// See [`Router::url`].
	pub fn url_in_context(
		&self,
		request: &RouteRequest,
		module: Option<&str>,
		controller: Option<&str>,
		params: &UrlParams,
	) -> Result<String> {
		let module = module
			.or_else(|| request.query_param("_module"))
			.unwrap_or(&self.default_module);
		let controller = controller
			.or_else(|| request.query_param("_controller"))
			.unwrap_or(&self.default_controller);
		self.url(module, controller, params)
	}

	/// Absolute URL with the scheme and host of `request`.
	///
	/// # Errors
	///
	/// See [`Router::url`].
	pub fn full_url(
		&self,
		request: &RouteRequest,
		module: &str,
		controller: &str,
		params: &UrlParams,
	) -> Result<String> {
		let path = self.url(module, controller, params)?;
		Ok(format!("{}://{}{}", request.scheme(), request.host(), path))
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Sets the URL prefix. Trailing slashes are trimmed and exactly one is
	/// appended.
	pub fn set_base_url(&mut self, base_url: &str) {
		self.base_url = normalize_base_url(base_url);
	}

	pub fn default_module(&self) -> &str {
		&self.default_module
	}

	pub fn set_default_module(&mut self, module: impl Into<String>) {
		self.default_module = module.into();
	}

	pub fn default_controller(&self) -> &str {
		&self.default_controller
	}

	pub fn set_default_controller(&mut self, controller: impl Into<String>) {
		self.default_controller = controller.into();
	}

	pub fn error_module(&self) -> &str {
		&self.error_module
	}

	pub fn set_error_module(&mut self, module: impl Into<String>) {
		self.error_module = module.into();
	}

	pub fn error_controller(&self) -> &str {
		&self.error_controller
	}

	pub fn set_error_controller(&mut self, controller: impl Into<String>) {
		self.error_controller = controller.into();
	}
}

fn normalize_base_url(base_url: &str) -> String {
	format!("{}/", base_url.trim_end_matches('/'))
}
