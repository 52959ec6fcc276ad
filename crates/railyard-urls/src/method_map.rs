//! Per-method controller targets.

use indexmap::IndexMap;
use railyard_core::exception::{Error, Result};
use railyard_core::request::{RequestMethod, RouteRequest};

/// Controller that handles one HTTP method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTarget {
	pub module: String,
	pub controller: String,
	/// Privilege name handed to the application's access checks. The router
	/// does not interpret it.
	pub acl: Option<String>,
}

impl MethodTarget {
	pub fn new(module: impl Into<String>, controller: impl Into<String>) -> Self {
		Self {
			module: module.into(),
			controller: controller.into(),
			acl: None,
		}
	}

	pub fn with_acl(mut self, privilege: impl Into<String>) -> Self {
		self.acl = Some(privilege.into());
		self
	}
}

/// Maps HTTP methods to controllers, typically for one REST resource.
///
/// # Examples
///
/// ```
/// use railyard_core::{Error, RequestMethod};
/// use railyard_urls::{MethodMap, MethodTarget};
///
/// let map = MethodMap::new()
///     .get(MethodTarget::new("users", "list"))
///     .post(MethodTarget::new("users", "create").with_acl("Users/Create"));
///
/// assert_eq!(map.resolve(RequestMethod::Get).unwrap().controller, "list");
/// assert!(matches!(
///     map.resolve(RequestMethod::Delete),
///     Err(Error::NotImplemented(_))
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
	targets: IndexMap<RequestMethod, MethodTarget>,
}

impl MethodMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `target` for `method`, replacing any previous target.
	pub fn register(mut self, method: RequestMethod, target: MethodTarget) -> Self {
		self.targets.insert(method, target);
		self
	}

	pub fn head(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Head, target)
	}

	pub fn get(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Get, target)
	}

	pub fn post(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Post, target)
	}

	pub fn patch(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Patch, target)
	}

	pub fn put(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Put, target)
	}

	pub fn delete(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Delete, target)
	}

	pub fn options(self, target: MethodTarget) -> Self {
		self.register(RequestMethod::Options, target)
	}

	/// Target registered for `method`.
	///
	/// # Errors
	///
	/// Returns [`Error::NotImplemented`] when nothing is registered.
	pub fn resolve(&self, method: RequestMethod) -> Result<&MethodTarget> {
		self.targets
			.get(&method)
			.ok_or_else(|| Error::NotImplemented(method.to_string()))
	}

	/// Target for the method of `request`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnsupportedMethod`] for a method outside
	/// [`RequestMethod`] and [`Error::NotImplemented`] when nothing is
	/// registered.
	pub fn resolve_request(&self, request: &RouteRequest) -> Result<&MethodTarget> {
		let method = RequestMethod::try_from(request.method())?;
		self.resolve(method)
	}

	/// Registered methods in registration order, e.g. for an `Allow` header.
	pub fn allowed(&self) -> Vec<RequestMethod> {
		self.targets.keys().copied().collect()
	}
}
