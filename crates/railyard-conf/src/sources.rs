//! Configuration sources for the layered settings system
//!
//! Each source yields a flat map of setting names to JSON values. The
//! builder merges them in priority order, higher priority last, so later
//! values win.

use crate::SettingsError;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SettingsError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Explicit default values, lowest priority.
#[derive(Debug, Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value
	///
	/// # Examples
	///
	/// ```
	/// use railyard_conf::DefaultSource;
	/// use serde_json::json;
	///
	/// let source = DefaultSource::new().with_value("base_url", json!("/portal"));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"defaults".to_string()
	}
}

/// Inline TOML document.
#[derive(Debug)]
pub struct TomlSource {
	content: String,
}

impl TomlSource {
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
		}
	}
}

impl ConfigSource for TomlSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		parse_toml(&self.content)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		"inline TOML".to_string()
	}
}

/// TOML file on disk. A missing file contributes nothing.
#[derive(Debug)]
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}
		let content = fs::read_to_string(&self.path)?;
		parse_toml(&content)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

fn parse_toml(content: &str) -> Result<IndexMap<String, Value>, SettingsError> {
	let table: toml::Table = toml::from_str(content)?;
	table
		.into_iter()
		.map(|(key, value)| {
			let value = serde_json::to_value(value)
				.map_err(|e| SettingsError::Invalid(format!("{}: {}", key, e)))?;
			Ok((key, value))
		})
		.collect()
}

/// Environment variable configuration source
///
/// `RAILYARD_BASE_URL=/app` becomes `base_url = "/app"` with the default
/// prefix.
#[derive(Debug)]
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Prefix used when none is given.
	pub const DEFAULT_PREFIX: &'static str = "RAILYARD_";

	pub fn new() -> Self {
		Self {
			prefix: Self::DEFAULT_PREFIX.to_string(),
		}
	}

	/// Only variables starting with `prefix` are read; the prefix is stripped.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let Some(stripped) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let lower_key = stripped.to_lowercase();

			let parsed_value = if lower_key == "cache_enabled" {
				match value.trim().to_lowercase().as_str() {
					"true" | "1" | "yes" | "on" => Value::Bool(true),
					"false" | "0" | "no" | "off" => Value::Bool(false),
					_ => Value::String(value),
				}
			} else {
				Value::String(value)
			};

			config.insert(lower_key, parsed_value);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("environment ({}*)", self.prefix)
	}
}
