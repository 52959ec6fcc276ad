//! Controller route declarations and the sources that enumerate them.
//!
//! A [`ControllerSource`] yields one [`ControllerRoutes`] per controller, in
//! discovery order. That order decides how routes are prioritized, so every
//! source must be deterministic.

use crate::param_type::ParamType;
use indexmap::IndexMap;
use railyard_core::exception::{Error, Result};
use std::collections::HashSet;

/// A single route declared by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
	/// Template used for matching and for URL generation.
	pub template: String,
	/// Optional regex that replaces the template for matching.
	pub pattern: Option<String>,
}

impl RouteDeclaration {
	pub fn new(template: impl Into<String>) -> Self {
		Self {
			template: template.into(),
			pattern: None,
		}
	}

	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}
}

/// Routes and parameter types declared by one controller.
///
/// # Examples
///
/// ```
/// use railyard_urls::{ControllerRoutes, ParamType};
///
/// let routes = ControllerRoutes::new("blog", "read")
///     .route("/blog/{$id}")
///     .route("/post/{$id}")
///     .param("id", ParamType::Int);
///
/// assert_eq!(routes.routes.len(), 2);
/// assert_eq!(routes.params["id"], ParamType::Int);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRoutes {
	pub module: String,
	pub controller: String,
	pub routes: Vec<RouteDeclaration>,
	pub params: IndexMap<String, ParamType>,
}

impl ControllerRoutes {
	pub fn new(module: impl Into<String>, controller: impl Into<String>) -> Self {
		Self {
			module: module.into(),
			controller: controller.into(),
			routes: Vec::new(),
			params: IndexMap::new(),
		}
	}

	/// Declares a route by template.
	pub fn route(mut self, template: impl Into<String>) -> Self {
		self.routes.push(RouteDeclaration::new(template));
		self
	}

	/// Declares a route with an explicit matching regex.
	pub fn route_with_pattern(
		mut self,
		template: impl Into<String>,
		pattern: impl Into<String>,
	) -> Self {
		self.routes
			.push(RouteDeclaration::new(template).with_pattern(pattern));
		self
	}

	/// Declares the type of a placeholder.
	pub fn param(mut self, name: impl Into<String>, param_type: impl Into<ParamType>) -> Self {
		self.params.insert(name.into(), param_type.into());
		self
	}
}

/// Enumerates the controllers of an application.
pub trait ControllerSource: Send + Sync {
	/// Every controller with its declared routes, in discovery order.
	///
	/// # Errors
	///
	/// Returns [`Error::Discovery`] when the controllers cannot be listed.
	fn controllers(&self) -> Result<Vec<ControllerRoutes>>;
}

/// A fixed list of controllers, returned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticControllerSource {
	controllers: Vec<ControllerRoutes>,
}

impl StaticControllerSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_controller(mut self, controller: ControllerRoutes) -> Self {
		self.controllers.push(controller);
		self
	}
}

impl FromIterator<ControllerRoutes> for StaticControllerSource {
	fn from_iter<I: IntoIterator<Item = ControllerRoutes>>(iter: I) -> Self {
		Self {
			controllers: iter.into_iter().collect(),
		}
	}
}

impl ControllerSource for StaticControllerSource {
	fn controllers(&self) -> Result<Vec<ControllerRoutes>> {
		Ok(self.controllers.clone())
	}
}

/// Controller registration entry.
///
/// This struct is used with `inventory::collect!` to gather controllers
/// registered anywhere in the binary:
///
/// ```
/// use railyard_urls::ControllerRegistration;
///
/// inventory::submit! {
///     ControllerRegistration {
///         module: "blog",
///         controller: "read",
///         routes: &["/blog/{$id}"],
///         params: &[("id", "int")],
///     }
/// }
/// ```
#[derive(Debug)]
pub struct ControllerRegistration {
	pub module: &'static str,
	pub controller: &'static str,
	/// Route templates.
	pub routes: &'static [&'static str],
	/// `(name, type)` pairs.
	pub params: &'static [(&'static str, &'static str)],
}

inventory::collect!(ControllerRegistration);

impl ControllerRegistration {
	fn to_routes(&self) -> ControllerRoutes {
		let routes = self
			.routes
			.iter()
			.fold(ControllerRoutes::new(self.module, self.controller), |acc, template| {
				acc.route(*template)
			});
		self.params
			.iter()
			.fold(routes, |acc, (name, param_type)| acc.param(*name, *param_type))
	}
}

/// Controllers submitted with `inventory::submit!`.
///
/// Registration order depends on the linker, so controllers are sorted by
/// `(module, controller)` to keep route priority stable between builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryControllerSource;

impl InventoryControllerSource {
	pub fn new() -> Self {
		Self
	}
}

impl ControllerSource for InventoryControllerSource {
	fn controllers(&self) -> Result<Vec<ControllerRoutes>> {
		let mut registrations: Vec<&ControllerRegistration> =
			inventory::iter::<ControllerRegistration>.into_iter().collect();
		registrations.sort_by_key(|registration| (registration.module, registration.controller));

		let mut seen = HashSet::new();
		for registration in &registrations {
			if !seen.insert((registration.module, registration.controller)) {
				return Err(Error::Discovery(format!(
					"controller '{}/{}' is registered more than once",
					registration.module, registration.controller
				)));
			}
		}

		Ok(registrations
			.into_iter()
			.map(ControllerRegistration::to_routes)
			.collect())
	}
}
