//! Positional `module/controller/key/value...` paths.

use crate::encoding::decode_segment;
use indexmap::IndexMap;

/// A path resolved by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRoute {
	pub module: String,
	pub controller: String,
	/// Key/value pairs from the segments after the controller.
	pub params: IndexMap<String, String>,
	/// Every segment after the controller, including an unpaired last one.
	pub raw_params: Vec<String>,
}

impl FallbackRoute {
	/// Splits a clean path (no leading or trailing `/`).
	///
	/// Missing or empty module and controller segments fall back to the
	/// given defaults. An odd trailing segment is kept in `raw_params` only.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_urls::FallbackRoute;
	///
	/// let route = FallbackRoute::parse("users/edit/id/42/extra", "index", "index");
	///
	/// assert_eq!(route.module, "users");
	/// assert_eq!(route.controller, "edit");
	/// assert_eq!(route.params["id"], "42");
	/// assert!(!route.params.contains_key("extra"));
	/// assert_eq!(route.raw_params, vec!["id", "42", "extra"]);
	/// ```
	pub fn parse(path: &str, default_module: &str, default_controller: &str) -> Self {
		let mut segments = path.split('/').map(decode_segment);

		let module = segments
			.next()
			.filter(|segment| !segment.is_empty())
			.unwrap_or_else(|| default_module.to_string());
		let controller = segments
			.next()
			.filter(|segment| !segment.is_empty())
			.unwrap_or_else(|| default_controller.to_string());

		let raw_params: Vec<String> = segments.collect();
		let params = raw_params
			.chunks_exact(2)
			.filter(|pair| !pair[0].is_empty())
			.map(|pair| (pair[0].clone(), pair[1].clone()))
			.collect();

		Self {
			module,
			controller,
			params,
			raw_params,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "index", "index")]
	#[case("users", "users", "index")]
	#[case("users/edit", "users", "edit")]
	#[case("/edit", "index", "edit")]
	fn test_module_and_controller(
		#[case] path: &str,
		#[case] module: &str,
		#[case] controller: &str,
	) {
		let route = FallbackRoute::parse(path, "index", "index");

		assert_eq!(route.module, module);
		assert_eq!(route.controller, controller);
		assert!(route.params.is_empty());
	}

	#[rstest]
	fn test_pairs_in_order() {
		let route = FallbackRoute::parse("shop/list/sort/price/page/3", "index", "index");

		let pairs: Vec<(&str, &str)> = route
			.params
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect();
		assert_eq!(pairs, vec![("sort", "price"), ("page", "3")]);
	}

	#[rstest]
	fn test_segments_are_decoded() {
		let route = FallbackRoute::parse("search/index/q/rust%20lang%2Fasync", "index", "index");
		assert_eq!(route.params["q"], "rust lang/async");
	}

	#[rstest]
	fn test_repeated_key_keeps_last_value() {
		let route = FallbackRoute::parse("a/b/k/1/k/2", "index", "index");
		assert_eq!(route.params["k"], "2");
		assert_eq!(route.raw_params.len(), 4);
	}
}
