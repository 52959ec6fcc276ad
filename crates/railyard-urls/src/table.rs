//! Forward and reverse route tables.
//!
//! The forward table is an ordered list tried first to last. Static routes
//! (no placeholders) come first, most recently discovered first; dynamic
//! routes follow in discovery order. The reverse table keeps the first route
//! each controller declared and is used to generate URLs.

use crate::discovery::{ControllerRoutes, ControllerSource};
use crate::encoding::decode_segment;
use crate::param_type::ParamType;
use crate::pattern::CompiledPattern;
use crate::template::RouteTemplate;
use indexmap::IndexMap;
use railyard_core::exception::Result;
use serde::{Deserialize, Serialize};

/// One compiled forward route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
	template: RouteTemplate,
	pattern: CompiledPattern,
	module: String,
	controller: String,
	params: IndexMap<String, ParamType>,
}

impl RouteEntry {
	/// Compiles a declared route.
	///
	/// # Errors
	///
	/// Returns [`railyard_core::Error::MalformedRoute`] when the template or
	/// the explicit pattern is invalid.
	pub fn compile(spec: RouteSpec) -> Result<Self> {
		let template = RouteTemplate::parse(&spec.template)?;
		let pattern = CompiledPattern::compile(&template, spec.pattern.as_deref(), &spec.params)?;
		Ok(Self {
			template,
			pattern,
			module: spec.module,
			controller: spec.controller,
			params: spec.params,
		})
	}

	pub fn template(&self) -> &RouteTemplate {
		&self.template
	}

	pub fn pattern(&self) -> &CompiledPattern {
		&self.pattern
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	pub fn controller(&self) -> &str {
		&self.controller
	}

	pub fn params(&self) -> &IndexMap<String, ParamType> {
		&self.params
	}

	/// Whether the route has no placeholders.
	pub fn is_static(&self) -> bool {
		!self.template.is_dynamic()
	}

	/// Matches `path` and returns the declared parameters it captured,
	/// percent-decoded.
	pub fn match_path(&self, path: &str) -> Option<IndexMap<String, String>> {
		let captures = self
			.pattern
			.captures(path, self.params.keys().map(String::as_str))?;
		Some(
			captures
				.into_iter()
				.map(|(name, value)| (name.to_string(), decode_segment(value)))
				.collect(),
		)
	}

	fn to_spec(&self) -> RouteSpec {
		RouteSpec {
			template: self.template.source().to_string(),
			pattern: self
				.pattern
				.is_explicit()
				.then(|| self.pattern.source().to_string()),
			module: self.module.clone(),
			controller: self.controller.clone(),
			params: self.params.clone(),
		}
	}
}

/// The template used to generate URLs for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseEntry {
	template: RouteTemplate,
	params: IndexMap<String, ParamType>,
}

impl ReverseEntry {
	pub fn template(&self) -> &RouteTemplate {
		&self.template
	}

	pub fn params(&self) -> &IndexMap<String, ParamType> {
		&self.params
	}
}

/// Serializable form of a forward route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
	pub template: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	pub module: String,
	pub controller: String,
	#[serde(default)]
	pub params: IndexMap<String, ParamType>,
}

/// Serializable form of a reverse entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseSpec {
	pub template: String,
	#[serde(default)]
	pub params: IndexMap<String, ParamType>,
}

/// Serializable reverse table: module, then controller.
pub type ReverseSnapshot = IndexMap<String, IndexMap<String, ReverseSpec>>;

/// Forward and reverse tables built together.
///
/// Tables are immutable once built and are shared between requests behind
/// an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTables {
	forward: Vec<RouteEntry>,
	reverse: IndexMap<String, IndexMap<String, ReverseEntry>>,
}

impl RoutingTables {
	/// Tables with no routes. Every request resolves through the positional
	/// scheme.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Builds the tables from every controller `source` yields.
	///
	/// A failing source produces empty tables. Malformed routes are skipped.
	/// Neither is an error: routing degrades to the positional scheme.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_urls::{ControllerRoutes, RoutingTables, StaticControllerSource};
	///
	/// let source = StaticControllerSource::new()
	///     .with_controller(ControllerRoutes::new("blog", "read").route("/blog/{$id}"))
	///     .with_controller(ControllerRoutes::new("pages", "about").route("/about"));
	///
	/// let tables = RoutingTables::build(&source);
	///
	/// // Static routes are tried before dynamic ones
	/// assert_eq!(tables.forward()[0].template().source(), "/about");
	/// assert!(tables.reverse_entry("blog", "read").is_some());
	/// ```
	pub fn build(source: &dyn ControllerSource) -> Self {
		match source.controllers() {
			Ok(controllers) => Self::from_controllers(controllers),
			Err(e) => {
				tracing::warn!(error = %e, "controller discovery failed, routing with empty tables");
				Self::empty()
			}
		}
	}

	/// Builds the tables from controllers in discovery order.
	pub fn from_controllers(controllers: Vec<ControllerRoutes>) -> Self {
		let mut statics = Vec::new();
		let mut dynamics = Vec::new();
		let mut reverse: IndexMap<String, IndexMap<String, ReverseEntry>> = IndexMap::new();

		for controller in controllers {
			for declaration in controller.routes {
				let spec = RouteSpec {
					template: declaration.template,
					pattern: declaration.pattern,
					module: controller.module.clone(),
					controller: controller.controller.clone(),
					params: controller.params.clone(),
				};
				let entry = match RouteEntry::compile(spec) {
					Ok(entry) => entry,
					Err(e) => {
						tracing::warn!(
							module = %controller.module,
							controller = %controller.controller,
							error = %e,
							"skipping malformed route"
						);
						continue;
					}
				};

				reverse
					.entry(entry.module.clone())
					.or_default()
					.entry(entry.controller.clone())
					.or_insert_with(|| ReverseEntry {
						template: entry.template.clone(),
						params: entry.params.clone(),
					});

				if entry.is_static() {
					statics.push(entry);
				} else {
					dynamics.push(entry);
				}
			}
		}

		let static_count = statics.len();
		let forward: Vec<RouteEntry> = statics.into_iter().rev().chain(dynamics).collect();
		tracing::debug!(
			routes = forward.len(),
			static_routes = static_count,
			controllers = reverse.values().map(IndexMap::len).sum::<usize>(),
			"built routing tables"
		);

		Self { forward, reverse }
	}

	/// Rebuilds tables from their serialized form.
	///
	/// # Errors
	///
	/// Returns [`railyard_core::Error::MalformedRoute`] when a stored route
	/// no longer compiles.
	pub fn from_snapshot(routes: Vec<RouteSpec>, reverse: ReverseSnapshot) -> Result<Self> {
		let forward = routes
			.into_iter()
			.map(RouteEntry::compile)
			.collect::<Result<Vec<_>>>()?;

		let mut reverse_entries = IndexMap::with_capacity(reverse.len());
		for (module, controllers) in reverse {
			let mut entries = IndexMap::with_capacity(controllers.len());
			for (controller, spec) in controllers {
				let template = RouteTemplate::parse(&spec.template)?;
				entries.insert(
					controller,
					ReverseEntry {
						template,
						params: spec.params,
					},
				);
			}
			reverse_entries.insert(module, entries);
		}

		Ok(Self {
			forward,
			reverse: reverse_entries,
		})
	}

	/// Serializable form of the forward table.
	pub fn route_specs(&self) -> Vec<RouteSpec> {
		self.forward.iter().map(RouteEntry::to_spec).collect()
	}

	/// Serializable form of the reverse table.
	pub fn reverse_snapshot(&self) -> ReverseSnapshot {
		self.reverse
			.iter()
			.map(|(module, controllers)| {
				let specs = controllers
					.iter()
					.map(|(controller, entry)| {
						(
							controller.clone(),
							ReverseSpec {
								template: entry.template.source().to_string(),
								params: entry.params.clone(),
							},
						)
					})
					.collect();
				(module.clone(), specs)
			})
			.collect()
	}

	/// Forward routes in match priority order.
	pub fn forward(&self) -> &[RouteEntry] {
		&self.forward
	}

	pub fn reverse_entry(&self, module: &str, controller: &str) -> Option<&ReverseEntry> {
		self.reverse.get(module)?.get(controller)
	}

	pub fn is_empty(&self) -> bool {
		self.forward.is_empty()
	}

	/// First forward route matching `path`, with its captured parameters.
	pub fn match_path(&self, path: &str) -> Option<(&RouteEntry, IndexMap<String, String>)> {
		self.forward
			.iter()
			.find_map(|entry| entry.match_path(path).map(|params| (entry, params)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::discovery::StaticControllerSource;
	use railyard_core::Error;
	use rstest::rstest;
	use tracing_test::traced_test;

	struct FailingSource;

	impl ControllerSource for FailingSource {
		fn controllers(&self) -> Result<Vec<ControllerRoutes>> {
			Err(Error::Discovery("controllers directory unreadable".to_string()))
		}
	}

	fn templates(tables: &RoutingTables) -> Vec<&str> {
		tables
			.forward()
			.iter()
			.map(|entry| entry.template().source())
			.collect()
	}

	#[rstest]
	fn test_static_routes_first_in_reverse_order() {
		let tables = RoutingTables::from_controllers(vec![
			ControllerRoutes::new("pages", "about")
				.route("/about")
				.route("/about-us"),
			ControllerRoutes::new("blog", "read")
				.route("/blog/{$id}")
				.param("id", ParamType::Int),
			ControllerRoutes::new("pages", "contact").route("/contact"),
			ControllerRoutes::new("blog", "tag").route("/tag/{$name}"),
		]);

		assert_eq!(
			templates(&tables),
			vec!["/contact", "/about-us", "/about", "/blog/{$id}", "/tag/{$name}"]
		);
	}

	#[rstest]
	fn test_reverse_keeps_first_template() {
		let tables = RoutingTables::from_controllers(vec![
			ControllerRoutes::new("blog", "read")
				.route("/blog/{$id}")
				.route("/post/{$id}"),
		]);

		let entry = tables.reverse_entry("blog", "read").unwrap();
		assert_eq!(entry.template().source(), "/blog/{$id}");
		assert!(tables.reverse_entry("blog", "missing").is_none());
	}

	#[test]
	#[traced_test]
	fn test_malformed_route_is_skipped_with_warning() {
		let tables = RoutingTables::from_controllers(vec![
			ControllerRoutes::new("shop", "item")
				.route("/item/{$id")
				.route("/item/{$id}"),
		]);

		assert_eq!(templates(&tables), vec!["/item/{$id}"]);
		assert_eq!(
			tables
				.reverse_entry("shop", "item")
				.unwrap()
				.template()
				.source(),
			"/item/{$id}"
		);
		assert!(logs_contain("skipping malformed route"));
	}

	#[test]
	#[traced_test]
	fn test_failing_source_yields_empty_tables() {
		let tables = RoutingTables::build(&FailingSource);

		assert!(tables.is_empty());
		assert!(logs_contain("controller discovery failed"));
	}

	#[rstest]
	fn test_match_path_first_match_wins() {
		let source = StaticControllerSource::new()
			.with_controller(
				ControllerRoutes::new("users", "show")
					.route("/users/{$id}")
					.param("id", ParamType::Int),
			)
			.with_controller(ControllerRoutes::new("users", "any").route("/users/{$name}"))
			.with_controller(ControllerRoutes::new("users", "me").route("/users/me"));
		let tables = RoutingTables::build(&source);

		let (entry, params) = tables.match_path("/users/42").unwrap();
		assert_eq!(entry.controller(), "show");
		assert_eq!(params["id"], "42");

		// The static route outranks both dynamic ones
		let (entry, _) = tables.match_path("/users/me").unwrap();
		assert_eq!(entry.controller(), "me");

		// Undeclared placeholders match but are not exported
		let (entry, params) = tables.match_path("/users/alice").unwrap();
		assert_eq!(entry.controller(), "any");
		assert!(params.is_empty());

		assert!(tables.match_path("/nowhere").is_none());
	}

	#[rstest]
	fn test_captures_are_decoded() {
		let tables = RoutingTables::from_controllers(vec![
			ControllerRoutes::new("search", "index")
				.route("/search/{$q}")
				.param("q", "query"),
		]);

		let (_, params) = tables.match_path("/search/rust%20lang").unwrap();
		assert_eq!(params["q"], "rust lang");
	}

	#[rstest]
	fn test_snapshot_restores_equal_tables() {
		let tables = RoutingTables::from_controllers(vec![
			ControllerRoutes::new("pages", "about").route("/about"),
			ControllerRoutes::new("archive", "year")
				.route_with_pattern("/archive/{$year}", r"^/archive/(?P<year>\d{4})$")
				.param("year", ParamType::Int),
		]);

		let restored =
			RoutingTables::from_snapshot(tables.route_specs(), tables.reverse_snapshot()).unwrap();

		assert_eq!(restored, tables);
		assert!(restored.forward()[1].pattern().is_explicit());
	}

	#[rstest]
	fn test_snapshot_with_broken_route_fails() {
		let specs = vec![RouteSpec {
			template: "/x/{$id".to_string(),
			pattern: None,
			module: "x".to_string(),
			controller: "index".to_string(),
			params: IndexMap::new(),
		}];

		let result = RoutingTables::from_snapshot(specs, ReverseSnapshot::new());
		assert!(matches!(result, Err(Error::MalformedRoute { .. })));
	}
}
