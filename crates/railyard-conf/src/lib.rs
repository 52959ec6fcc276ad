//! # Railyard Conf
//!
//! Router settings loaded from layered sources. Sources are merged in
//! priority order (environment variables > TOML files > defaults) and the
//! result is deserialized into [`RouterSettings`].
//!
//! ```
//! use railyard_conf::{RouterSettings, SettingsBuilder, TomlSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlSource::new(r#"base_url = "/app""#))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.base_url, "/app");
//! assert_eq!(settings.default_module, RouterSettings::DEFAULT_MODULE);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{RouterSettings, SettingsBuilder};
pub use sources::{ConfigSource, DefaultSource, EnvSource, TomlFileSource, TomlSource};

/// Error type for settings loading
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid settings: {0}")]
	Invalid(String),
}
