//! Compiled forward patterns.

use crate::param_type::ParamType;
use crate::template::{RouteTemplate, malformed};
use indexmap::IndexMap;
use railyard_core::exception::Result;
use regex::Regex;
use std::fmt;

/// Maximum allowed size for a compiled route regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A regex matcher for one route.
///
/// The regex comes either from the route's template or from an explicit
/// pattern declared next to it. Two patterns are equal when their sources
/// are.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	source: String,
	regex: Regex,
	explicit: bool,
}

impl CompiledPattern {
	/// Compiles `template`, or `explicit` when one is given.
	///
	/// # Errors
	///
	/// Returns [`railyard_core::Error::MalformedRoute`] when the regex does
	/// not compile or exceeds the size limit.
	pub fn compile(
		template: &RouteTemplate,
		explicit: Option<&str>,
		params: &IndexMap<String, ParamType>,
	) -> Result<Self> {
		let (source, is_explicit) = match explicit {
			Some(pattern) => (pattern.to_string(), true),
			None => (template.to_regex(params), false),
		};

		// Use RegexBuilder with size limits to prevent memory exhaustion
		let regex = regex::RegexBuilder::new(&source)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| {
				malformed(
					template.source(),
					format!("failed to compile pattern regex: {}", e),
				)
			})?;

		Ok(Self {
			source,
			regex,
			explicit: is_explicit,
		})
	}

	/// The regex source.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Whether the regex was declared explicitly instead of derived.
	pub fn is_explicit(&self) -> bool {
		self.explicit
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Named captures of `path` restricted to `names`.
	///
	/// Returns `None` when the path does not match. Groups that did not take
	/// part in the match are left out.
	pub fn captures<'a>(
		&self,
		path: &'a str,
		names: impl Iterator<Item = &'a str>,
	) -> Option<Vec<(&'a str, &'a str)>> {
		let caps = self.regex.captures(path)?;
		Some(
			names
				.filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
				.collect(),
		)
	}
}

impl PartialEq for CompiledPattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source && self.explicit == other.explicit
	}
}

impl Eq for CompiledPattern {}

impl fmt::Display for CompiledPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.source)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use railyard_core::Error;
	use rstest::rstest;

	fn int_params(names: &[&str]) -> IndexMap<String, ParamType> {
		names
			.iter()
			.map(|name| (name.to_string(), ParamType::Int))
			.collect()
	}

	#[rstest]
	fn test_compile_from_template() {
		let template = RouteTemplate::parse("/users/{$id}/posts/{$post}").unwrap();
		let pattern = CompiledPattern::compile(&template, None, &int_params(&["id", "post"])).unwrap();

		assert!(!pattern.is_explicit());
		assert!(pattern.is_match("/users/42/posts/7"));
		assert!(!pattern.is_match("/users/abc/posts/7"));
	}

	#[rstest]
	fn test_explicit_pattern_overrides_template() {
		let template = RouteTemplate::parse("/archive/{$year}").unwrap();
		let pattern = CompiledPattern::compile(
			&template,
			Some(r"^/archive/(?P<year>\d{4})$"),
			&IndexMap::new(),
		)
		.unwrap();

		assert!(pattern.is_explicit());
		assert!(pattern.is_match("/archive/2024"));
		assert!(!pattern.is_match("/archive/24"));
	}

	#[rstest]
	fn test_invalid_explicit_pattern_is_malformed() {
		let template = RouteTemplate::parse("/broken").unwrap();
		let result = CompiledPattern::compile(&template, Some("^/broken(["), &IndexMap::new());

		match result {
			Err(Error::MalformedRoute { template, reason }) => {
				assert_eq!(template, "/broken");
				assert!(reason.contains("failed to compile"));
			}
			other => panic!("expected MalformedRoute, got {:?}", other),
		}
	}

	#[rstest]
	fn test_duplicate_placeholder_is_malformed() {
		let template = RouteTemplate::parse("/{$id}/{$id}").unwrap();
		let result = CompiledPattern::compile(&template, None, &IndexMap::new());

		assert!(matches!(result, Err(Error::MalformedRoute { .. })));
	}

	#[rstest]
	fn test_captures_restricted_to_names() {
		let template = RouteTemplate::parse("/shop/{$category}/{$item}").unwrap();
		let pattern = CompiledPattern::compile(&template, None, &IndexMap::new()).unwrap();

		let captures = pattern.captures("/shop/books/42", ["item"].into_iter()).unwrap();

		assert_eq!(captures, vec![("item", "42")]);
		assert!(pattern.captures("/cart", ["item"].into_iter()).is_none());
	}

	#[rstest]
	fn test_unmatched_optional_group_is_absent() {
		let template = RouteTemplate::parse("/list/{$page?}").unwrap();
		let pattern = CompiledPattern::compile(&template, None, &int_params(&["page"])).unwrap();

		assert_eq!(
			pattern.captures("/list", ["page"].into_iter()),
			Some(vec![])
		);
		assert_eq!(
			pattern.captures("/list/3", ["page"].into_iter()),
			Some(vec![("page", "3")])
		);
	}
}
