//! The request abstraction consumed by the router.
//!
//! The router only needs three things from an inbound request: its path,
//! its query parameters, and a way to produce a copy with replaced query
//! parameters. [`RouteRequest`] carries exactly that plus the scheme and host
//! used when building absolute URLs.

use crate::exception::{Error, Result};
use http::{Method, Uri};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered query parameter map. Later inserts of an existing key keep the
/// key's original position.
pub type QueryParams = IndexMap<String, String>;

/// HTTP methods a controller mapping can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
	Head,
	Get,
	Post,
	Patch,
	Put,
	Delete,
	Options,
}

impl RequestMethod {
	/// All supported methods, in declaration order.
	pub const ALL: [RequestMethod; 7] = [
		Self::Head,
		Self::Get,
		Self::Post,
		Self::Patch,
		Self::Put,
		Self::Delete,
		Self::Options,
	];

	/// Upper-case method token.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Head => "HEAD",
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Patch => "PATCH",
			Self::Put => "PUT",
			Self::Delete => "DELETE",
			Self::Options => "OPTIONS",
		}
	}
}

impl fmt::Display for RequestMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RequestMethod {
	type Err = Error;

	/// Parses a method token case-insensitively.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_core::RequestMethod;
	///
	/// assert_eq!("patch".parse::<RequestMethod>().unwrap(), RequestMethod::Patch);
	/// assert!("TRACE".parse::<RequestMethod>().is_err());
	/// ```
	fn from_str(s: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|method| method.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
	}
}

impl TryFrom<&Method> for RequestMethod {
	type Error = Error;

	fn try_from(method: &Method) -> Result<Self> {
		method.as_str().parse()
	}
}

/// A request as seen by the router.
#[derive(Debug, Clone)]
pub struct RouteRequest {
	method: Method,
	uri: Uri,
	secure: bool,
	host: Option<String>,
	query_params: QueryParams,
}

impl RouteRequest {
	/// Starts building a request.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_core::RouteRequest;
	///
	/// let request = RouteRequest::builder()
	///     .uri("/users/edit?tab=profile")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/users/edit");
	/// assert_eq!(request.query_param("tab"), Some("profile"));
	/// ```
	pub fn builder() -> RouteRequestBuilder {
		RouteRequestBuilder::default()
	}

	fn parse_query_params(uri: &Uri) -> QueryParams {
		uri.query()
			.map(|q| {
				url::form_urlencoded::parse(q.as_bytes())
					.map(|(k, v)| (k.into_owned(), v.into_owned()))
					.collect()
			})
			.unwrap_or_default()
	}

	/// The HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// The request path, without query string.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// The full request URI.
	pub fn uri(&self) -> &Uri {
		&self.uri
	}

	/// Decoded query parameters, in the order they appeared.
	pub fn query_params(&self) -> &QueryParams {
		&self.query_params
	}

	/// A single decoded query parameter.
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query_params.get(key).map(String::as_str)
	}

	/// Returns a copy of this request with its query parameters replaced.
	///
	/// The URI is left untouched; only the parameter set the application
	/// reads from changes.
	pub fn with_query_params(mut self, query_params: QueryParams) -> Self {
		self.query_params = query_params;
		self
	}

	/// `https` when the URI says so or the request was flagged secure.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_core::RouteRequest;
	///
	/// let request = RouteRequest::builder().uri("/").secure(true).build().unwrap();
	/// assert_eq!(request.scheme(), "https");
	///
	/// let request = RouteRequest::builder().uri("http://example.com/").build().unwrap();
	/// assert_eq!(request.scheme(), "http");
	/// ```
	pub fn scheme(&self) -> &str {
		match self.uri.scheme_str() {
			Some(scheme) => scheme,
			None if self.secure => "https",
			None => "http",
		}
	}

	/// Host from the URI authority, then the explicit host, then `localhost`.
	pub fn host(&self) -> &str {
		self.uri
			.authority()
			.map(|authority| authority.as_str())
			.or(self.host.as_deref())
			.unwrap_or("localhost")
	}
}

/// Builder for [`RouteRequest`].
#[derive(Debug, Default)]
pub struct RouteRequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	secure: bool,
	host: Option<String>,
}

impl RouteRequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());
		self
	}

	/// Builds the request, parsing the URI and its query string.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidRequest`] when the URI does not parse.
	pub fn build(self) -> Result<RouteRequest> {
		let raw = self.uri.unwrap_or_else(|| "/".to_string());
		let uri: Uri = raw
			.parse()
			.map_err(|e| Error::InvalidRequest(format!("{}: {}", raw, e)))?;
		let query_params = RouteRequest::parse_query_params(&uri);

		Ok(RouteRequest {
			method: self.method.unwrap_or(Method::GET),
			uri,
			secure: self.secure,
			host: self.host,
			query_params,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("GET", RequestMethod::Get)]
	#[case("head", RequestMethod::Head)]
	#[case("Delete", RequestMethod::Delete)]
	#[case("OPTIONS", RequestMethod::Options)]
	fn test_method_parse(#[case] token: &str, #[case] expected: RequestMethod) {
		assert_eq!(token.parse::<RequestMethod>().unwrap(), expected);
	}

	#[rstest]
	fn test_method_from_http_method() {
		assert_eq!(
			RequestMethod::try_from(&Method::PUT).unwrap(),
			RequestMethod::Put
		);
		assert!(RequestMethod::try_from(&Method::TRACE).is_err());
	}

	#[rstest]
	fn test_query_params_are_decoded_in_order() {
		let request = RouteRequest::builder()
			.uri("/search?q=hello%20world&page=2&sort=name+asc")
			.build()
			.unwrap();

		let keys: Vec<&str> = request.query_params().keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["q", "page", "sort"]);
		assert_eq!(request.query_param("q"), Some("hello world"));
		assert_eq!(request.query_param("sort"), Some("name asc"));
	}

	#[rstest]
	fn test_with_query_params_replaces_set() {
		let request = RouteRequest::builder().uri("/?a=1").build().unwrap();
		let mut params = QueryParams::new();
		params.insert("b".to_string(), "2".to_string());

		let request = request.with_query_params(params);

		assert_eq!(request.query_param("a"), None);
		assert_eq!(request.query_param("b"), Some("2"));
		assert_eq!(request.path(), "/");
	}

	#[rstest]
	fn test_host_resolution() {
		let absolute = RouteRequest::builder()
			.uri("https://example.com/users")
			.build()
			.unwrap();
		assert_eq!(absolute.host(), "example.com");
		assert_eq!(absolute.scheme(), "https");

		let relative = RouteRequest::builder()
			.uri("/users")
			.host("shop.test")
			.build()
			.unwrap();
		assert_eq!(relative.host(), "shop.test");

		let bare = RouteRequest::builder().build().unwrap();
		assert_eq!(bare.host(), "localhost");
		assert_eq!(bare.path(), "/");
	}

	#[rstest]
	fn test_invalid_uri_is_rejected() {
		let result = RouteRequest::builder().uri("/bad path").build();
		assert!(matches!(result, Err(Error::InvalidRequest(_))));
	}
}
