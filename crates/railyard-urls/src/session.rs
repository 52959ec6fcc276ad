//! Per-request routing state.

use crate::fallback::FallbackRoute;
use crate::router::Router;
use crate::url_builder::UrlParams;
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use railyard_core::exception::Result;
use railyard_core::request::{QueryParams, RouteRequest};

/// Parameter holding the resolved module.
pub const MODULE_PARAM: &str = "_module";
/// Parameter holding the resolved controller.
pub const CONTROLLER_PARAM: &str = "_controller";

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Empty path: default module and controller.
	Default,
	/// A declared route matched.
	Custom,
	/// Positional `module/controller/key/value` path.
	Fallback,
}

/// Routing state of one request.
///
/// Before [`RouterSession::process`] the parameters are the request's query
/// parameters. Processing merges in the resolved target and path
/// parameters, which win over the query string.
#[derive(Debug)]
pub struct RouterSession<'r> {
	router: &'r Router,
	request: RouteRequest,
	clean_path: OnceCell<String>,
	resolution: Option<Resolution>,
	params: QueryParams,
	raw_params: Vec<String>,
}

impl<'r> RouterSession<'r> {
	pub(crate) fn new(router: &'r Router, request: RouteRequest) -> Self {
		let params = request.query_params().clone();
		Self {
			router,
			request,
			clean_path: OnceCell::new(),
			resolution: None,
			params,
			raw_params: Vec::new(),
		}
	}

	/// Request path relative to the base URL, without surrounding slashes.
	///
	/// Computed on first use.
	pub fn clean_path(&self) -> &str {
		self.clean_path
			.get_or_init(|| clean_path(self.request.path(), self.router.base_url()))
	}

	/// Resolves the request and merges the result into the parameters.
	///
	/// Tries, in order: the default target for an empty path, the declared
	/// routes, then the positional scheme. Merge precedence is
	/// defaults < query string < path, so an empty path extracts nothing and
	/// the query string may still name the target.
	pub fn process(&mut self) -> Resolution {
		let clean = self.clean_path().to_string();
		let router = self.router;

		let mut path_params = IndexMap::new();
		let resolution = if clean.is_empty() {
			self.raw_params.clear();
			Resolution::Default
		} else if let Some((entry, captures)) = router
			.tables()
			.match_path(&route_path(self.request.path(), router.base_url()))
		{
			path_params.insert(MODULE_PARAM.to_string(), entry.module().to_string());
			path_params.insert(CONTROLLER_PARAM.to_string(), entry.controller().to_string());
			path_params.extend(captures);
			self.raw_params.clear();
			Resolution::Custom
		} else {
			let route = FallbackRoute::parse(
				&clean,
				router.default_module(),
				router.default_controller(),
			);
			path_params.insert(MODULE_PARAM.to_string(), route.module);
			path_params.insert(CONTROLLER_PARAM.to_string(), route.controller);
			path_params.extend(route.params);
			self.raw_params = route.raw_params;
			Resolution::Fallback
		};

		let mut merged = QueryParams::new();
		merged.insert(MODULE_PARAM.to_string(), router.default_module().to_string());
		merged.insert(
			CONTROLLER_PARAM.to_string(),
			router.default_controller().to_string(),
		);
		merged.extend(
			self.request
				.query_params()
				.iter()
				.map(|(k, v)| (k.clone(), v.clone())),
		);
		merged.extend(path_params);
		self.params = merged;
		self.resolution = Some(resolution);

		tracing::debug!(
			path = %clean,
			?resolution,
			module = %self.module(),
			controller = %self.controller(),
			"resolved request"
		);
		resolution
	}

	/// How the request was resolved, once processed.
	pub fn resolution(&self) -> Option<Resolution> {
		self.resolution
	}

	/// Resolved module, or the default before processing.
	pub fn module(&self) -> &str {
		self.param_or(MODULE_PARAM, self.router.default_module())
	}

	/// Resolved controller, or the default before processing.
	pub fn controller(&self) -> &str {
		self.param_or(CONTROLLER_PARAM, self.router.default_controller())
	}

	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}

	pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
		self.param(key).unwrap_or(default)
	}

	/// Sets a parameter, or removes it with `None`.
	pub fn set_param(&mut self, key: impl Into<String>, value: Option<&str>) {
		let key = key.into();
		match value {
			Some(value) => {
				self.params.insert(key, value.to_string());
			}
			None => {
				self.params.shift_remove(&key);
			}
		}
	}

	pub fn params(&self) -> &QueryParams {
		&self.params
	}

	/// Positional segments after the controller, unpaired.
	pub fn raw_params(&self) -> &[String] {
		&self.raw_params
	}

	/// The request as received.
	pub fn request(&self) -> &RouteRequest {
		&self.request
	}

	/// The request with its query parameters replaced by the session's.
	pub fn into_request(self) -> RouteRequest {
		self.request.with_query_params(self.params)
	}

	/// URL relative to the current target; a missing module or controller
	/// is the resolved one.
	///
	/// # Errors
	///
	/// See [`Router::url`].
	pub fn url(
		&self,
		module: Option<&str>,
		controller: Option<&str>,
		params: &UrlParams,
	) -> Result<String> {
		self.router.url(
			module.unwrap_or(self.module()),
			controller.unwrap_or(self.controller()),
			params,
		)
	}
}

fn relative_path<'a>(path: &'a str, base_url: &str) -> &'a str {
	match path.strip_prefix(base_url) {
		Some(rest) => rest,
		None if path == base_url.trim_end_matches('/') => "",
		None => path,
	}
}

fn clean_path(path: &str, base_url: &str) -> String {
	relative_path(path, base_url).trim_matches('/').to_string()
}

/// Path handed to the declared routes: one leading slash, trailing slash
/// kept.
fn route_path(path: &str, base_url: &str) -> String {
	format!("/{}", relative_path(path, base_url).trim_start_matches('/'))
}
