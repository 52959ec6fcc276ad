//! Router settings and the builder that assembles them from sources.

use crate::SettingsError;
use crate::sources::ConfigSource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration for the router.
///
/// Missing keys fall back to [`RouterSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// URL prefix the application is mounted under.
	pub base_url: String,
	/// Module used for the home page and for paths without a module segment.
	pub default_module: String,
	/// Controller used when a path has no controller segment.
	pub default_controller: String,
	/// Module that renders routing and dispatch errors.
	pub error_module: String,
	pub error_controller: String,
	/// Whether compiled route tables are cached between router instances.
	pub cache_enabled: bool,
}

impl RouterSettings {
	pub const DEFAULT_MODULE: &'static str = "index";
	pub const DEFAULT_CONTROLLER: &'static str = "index";
	pub const ERROR_MODULE: &'static str = "error";
	pub const ERROR_CONTROLLER: &'static str = "index";

	/// Rejects settings the router cannot work with.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Invalid`] when a module or controller name is
	/// empty or contains a path separator.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let names = [
			("default_module", &self.default_module),
			("default_controller", &self.default_controller),
			("error_module", &self.error_module),
			("error_controller", &self.error_controller),
		];
		for (field, value) in names {
			if value.is_empty() {
				return Err(SettingsError::Invalid(format!("{} must not be empty", field)));
			}
			if value.contains('/') {
				return Err(SettingsError::Invalid(format!(
					"{} must be a single path segment, got '{}'",
					field, value
				)));
			}
		}
		Ok(())
	}
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			base_url: "/".to_string(),
			default_module: Self::DEFAULT_MODULE.to_string(),
			default_controller: Self::DEFAULT_CONTROLLER.to_string(),
			error_module: Self::ERROR_MODULE.to_string(),
			error_controller: Self::ERROR_CONTROLLER.to_string(),
			cache_enabled: true,
		}
	}
}

/// Merges [`ConfigSource`]s into [`RouterSettings`].
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Loads every source and deserializes the merged result.
	///
	/// Sources are applied lowest priority first; sources with equal
	/// priority apply in the order they were added.
	///
	/// # Examples
	///
	/// ```
	/// use railyard_conf::{DefaultSource, SettingsBuilder, TomlSource};
	/// use serde_json::json;
	///
	/// let settings = SettingsBuilder::new()
	///     .add_source(TomlSource::new(r#"default_module = "home""#))
	///     .add_source(DefaultSource::new().with_value("default_module", json!("ignored")))
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(settings.default_module, "home");
	/// ```
	pub fn build(mut self) -> Result<RouterSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		for source in &self.sources {
			let values = source.load()?;
			tracing::trace!(source = %source.description(), keys = values.len(), "loaded settings source");
			merged.extend(values);
		}

		let object = Value::Object(merged.into_iter().collect());
		let settings: RouterSettings = serde_json::from_value(object)
			.map_err(|e| SettingsError::Invalid(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::{DefaultSource, TomlSource};
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_defaults() {
		let settings = SettingsBuilder::new().build().unwrap();
		assert_eq!(settings, RouterSettings::default());
		assert_eq!(settings.base_url, "/");
		assert_eq!(settings.error_module, "error");
	}

	#[rstest]
	fn test_higher_priority_wins() {
		let settings = SettingsBuilder::new()
			.add_source(TomlSource::new(r#"base_url = "/toml""#))
			.add_source(DefaultSource::new().with_value("base_url", json!("/default")))
			.build()
			.unwrap();

		assert_eq!(settings.base_url, "/toml");
	}

	#[rstest]
	#[case("default_module", "")]
	#[case("error_controller", "a/b")]
	fn test_invalid_names_rejected(#[case] key: &str, #[case] value: &str) {
		let result = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value(key, json!(value)))
			.build();

		assert!(matches!(result, Err(SettingsError::Invalid(_))));
	}

	#[rstest]
	fn test_wrong_type_rejected() {
		let result = SettingsBuilder::new()
			.add_source(TomlSource::new("cache_enabled = \"sometimes\""))
			.build();

		assert!(matches!(result, Err(SettingsError::Invalid(_))));
	}
}
