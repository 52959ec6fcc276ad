//! Reverse URL generation.
//!
//! A URL for `(module, controller, params)` is built from the controller's
//! reverse template when it has one. Otherwise the positional scheme
//! `module/controller/key/value...` is used. Parameters that cannot be
//! placed in the path go to the query string.

use crate::encoding::encode_segment;
use crate::table::RoutingTables;
use indexmap::IndexMap;
use railyard_core::exception::{Error, Result};
use url::form_urlencoded;

/// A parameter value for URL generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
	Scalar(String),
	/// Encoded as `key[0]=a&key[1]=b`.
	List(Vec<String>),
	/// Encoded as `key[name]=value`.
	Map(IndexMap<String, String>),
}

impl ParamValue {
	pub fn as_scalar(&self) -> Option<&str> {
		match self {
			Self::Scalar(value) => Some(value),
			_ => None,
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Scalar(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Scalar(value)
	}
}

impl From<&String> for ParamValue {
	fn from(value: &String) -> Self {
		Self::Scalar(value.clone())
	}
}

macro_rules! impl_from_number {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for ParamValue {
				fn from(value: $ty) -> Self {
					Self::Scalar(value.to_string())
				}
			}
		)*
	};
}

impl_from_number!(i32, i64, u32, u64, usize, f64);

impl<T: Into<String>> From<Vec<T>> for ParamValue {
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}

impl From<IndexMap<String, String>> for ParamValue {
	fn from(values: IndexMap<String, String>) -> Self {
		Self::Map(values)
	}
}

/// Ordered parameters for URL generation.
pub type UrlParams = IndexMap<String, ParamValue>;

/// Builds [`UrlParams`] from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use railyard_urls::{ParamValue, url_params};
///
/// let params = url_params! { "id" => 42, "tags" => vec!["a", "b"] };
/// assert_eq!(params["id"], ParamValue::Scalar("42".to_string()));
/// ```
#[macro_export]
macro_rules! url_params {
	() => {
		$crate::UrlParams::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut params = $crate::UrlParams::new();
		$(
			params.insert(::std::string::String::from($key), $crate::ParamValue::from($value));
		)+
		params
	}};
}

/// Encodes parameters as a query string, without the leading `?`.
///
/// Lists and maps use bracket notation so they decode back into the same
/// keys on the way in.
///
/// # Examples
///
/// ```
/// use railyard_urls::{build_query, url_params};
///
/// let query = build_query(&url_params! { "q" => "a b", "tags" => vec!["x", "y"] });
/// assert_eq!(query, "q=a+b&tags%5B0%5D=x&tags%5B1%5D=y");
/// ```
pub fn build_query<'a>(params: impl IntoIterator<Item = (&'a String, &'a ParamValue)>) -> String {
	let mut serializer = form_urlencoded::Serializer::new(String::new());
	for (key, value) in params {
		match value {
			ParamValue::Scalar(scalar) => {
				serializer.append_pair(key, scalar);
			}
			ParamValue::List(items) => {
				for (index, item) in items.iter().enumerate() {
					serializer.append_pair(&format!("{}[{}]", key, index), item);
				}
			}
			ParamValue::Map(entries) => {
				for (name, item) in entries {
					serializer.append_pair(&format!("{}[{}]", key, name), item);
				}
			}
		}
	}
	serializer.finish()
}

/// Generates URLs against a set of routing tables.
#[derive(Debug, Clone, Copy)]
pub struct UrlBuilder<'a> {
	tables: &'a RoutingTables,
	base_url: &'a str,
	default_module: &'a str,
	default_controller: &'a str,
}

impl<'a> UrlBuilder<'a> {
	/// `base_url` must already be normalized to end with `/`.
	pub fn new(
		tables: &'a RoutingTables,
		base_url: &'a str,
		default_module: &'a str,
		default_controller: &'a str,
	) -> Self {
		Self {
			tables,
			base_url,
			default_module,
			default_controller,
		}
	}

	/// Builds the URL for `module`/`controller`.
	///
	/// # Errors
	///
	/// Returns [`Error::UnresolvableTarget`] when `module` or `controller` is
	/// empty.
	pub fn build(&self, module: &str, controller: &str, params: &UrlParams) -> Result<String> {
		if module.is_empty() || controller.is_empty() {
			return Err(Error::UnresolvableTarget {
				module: module.to_string(),
				controller: controller.to_string(),
			});
		}

		match self.tables.reverse_entry(module, controller) {
			Some(entry) => {
				let template = entry.template();
				let (substitutions, query): (UrlParams, UrlParams) =
					params.iter().map(|(k, v)| (k.clone(), v.clone())).partition(
						|(key, value)| value.as_scalar().is_some() && template.has_placeholder(key),
					);
				let substitutions: IndexMap<String, String> = substitutions
					.into_iter()
					.filter_map(|(key, value)| match value {
						ParamValue::Scalar(scalar) => Some((key, scalar)),
						_ => None,
					})
					.collect();

				let path = template.generate(&substitutions);
				Ok(self.finish(path.trim_start_matches('/'), &build_query(&query)))
			}
			None => Ok(self.build_positional(module, controller, params)),
		}
	}

	fn build_positional(&self, module: &str, controller: &str, params: &UrlParams) -> String {
		if params.is_empty() && controller == self.default_controller {
			if module == self.default_module {
				return self.base_url.to_string();
			}
			return format!("{}{}", self.base_url, encode_segment(module));
		}

		let mut path = format!("{}/{}", encode_segment(module), encode_segment(controller));
		let mut query = UrlParams::new();
		for (key, value) in params {
			match value {
				ParamValue::Scalar(scalar) => {
					path.push('/');
					path.push_str(&encode_segment(key));
					path.push('/');
					path.push_str(&encode_segment(scalar));
				}
				_ => {
					query.insert(key.clone(), value.clone());
				}
			}
		}

		self.finish(&path, &build_query(&query))
	}

	fn finish(&self, path: &str, query: &str) -> String {
		if query.is_empty() {
			format!("{}{}", self.base_url, path)
		} else {
			format!("{}{}?{}", self.base_url, path, query)
		}
	}
}
