//! Declared parameter types and the path segment classes they capture.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a route parameter.
///
/// The type only narrows what a placeholder matches; captured values are
/// always handed to the application as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
	/// Digits only.
	Int,
	/// Digits with `.` or `,` separators.
	Float,
	/// A word made of letters, digits, `-`, `_`, `.` and `~`, or
	/// percent-encoded octets.
	Text,
	/// A module name. Matches like [`ParamType::Text`].
	Module,
	/// A controller name. Matches like [`ParamType::Text`].
	Controller,
	/// Any other declared type. Matches a single path segment.
	Other(String),
}

impl ParamType {
	/// Regex class used for a placeholder of this type.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_urls::ParamType;
	///
	/// assert_eq!(ParamType::Int.capture_class(), "[0-9]+");
	/// assert_eq!(ParamType::from("uuid").capture_class(), "[^/]+");
	/// ```
	pub fn capture_class(&self) -> &'static str {
		match self {
			Self::Int => "[0-9]+",
			Self::Float => "[0-9.,]+",
			Self::Text | Self::Module | Self::Controller => TEXT_CAPTURE_CLASS,
			Self::Other(_) => DEFAULT_CAPTURE_CLASS,
		}
	}

	/// Name used in declarations and in cached tables.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Int => "int",
			Self::Float => "float",
			Self::Text => "string",
			Self::Module => "module",
			Self::Controller => "controller",
			Self::Other(name) => name,
		}
	}
}

// Substituted values are percent-encoded on generation.
const TEXT_CAPTURE_CLASS: &str = r"(?:[a-zA-Z0-9\-_.~]|%[0-9A-Fa-f]{2})+";

/// Class for placeholders without a declared type.
pub(crate) const DEFAULT_CAPTURE_CLASS: &str = "[^/]+";

impl From<&str> for ParamType {
	fn from(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"int" | "integer" => Self::Int,
			"float" | "double" => Self::Float,
			"string" | "str" => Self::Text,
			"module" => Self::Module,
			"controller" => Self::Controller,
			_ => Self::Other(name.to_string()),
		}
	}
}

impl From<String> for ParamType {
	fn from(name: String) -> Self {
		Self::from(name.as_str())
	}
}

impl From<ParamType> for String {
	fn from(param_type: ParamType) -> Self {
		param_type.as_str().to_string()
	}
}

impl fmt::Display for ParamType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("int", ParamType::Int)]
	#[case("Integer", ParamType::Int)]
	#[case("float", ParamType::Float)]
	#[case("string", ParamType::Text)]
	#[case("module", ParamType::Module)]
	#[case("controller", ParamType::Controller)]
	#[case("slug", ParamType::Other("slug".to_string()))]
	fn test_from_name(#[case] name: &str, #[case] expected: ParamType) {
		assert_eq!(ParamType::from(name), expected);
	}

	#[rstest]
	#[case(ParamType::Int, "42", true)]
	#[case(ParamType::Int, "4.2", false)]
	#[case(ParamType::Float, "4,2", true)]
	#[case(ParamType::Text, "hello-world_1.0", true)]
	#[case(ParamType::Module, "a b", false)]
	#[case(ParamType::Text, "bob%20smith", true)]
	#[case(ParamType::Text, "~bob", true)]
	#[case(ParamType::Text, "h%C3%A9llo", true)]
	#[case(ParamType::Text, "100%", false)]
	#[case(ParamType::Text, "%zz", false)]
	#[case(ParamType::Other("any".to_string()), "a b", true)]
	#[case(ParamType::Other("any".to_string()), "a/b", false)]
	fn test_capture_class(#[case] param_type: ParamType, #[case] value: &str, #[case] matches: bool) {
		let regex = regex::Regex::new(&format!("^{}$", param_type.capture_class())).unwrap();
		assert_eq!(regex.is_match(value), matches);
	}

	#[rstest]
	fn test_serializes_as_name() {
		let json = serde_json::to_string(&ParamType::Float).unwrap();
		assert_eq!(json, "\"float\"");

		let parsed: ParamType = serde_json::from_str("\"uuid\"").unwrap();
		assert_eq!(parsed, ParamType::Other("uuid".to_string()));
	}
}
