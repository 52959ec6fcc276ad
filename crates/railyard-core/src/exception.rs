//! Error types shared across the Railyard workspace.

use thiserror::Error;

/// Errors raised while building route tables, generating URLs or loading
/// router configuration.
///
/// Request resolution itself never fails: an unmatched path falls through to
/// the positional scheme, so none of these variants describe a "not found"
/// request.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// A route template or explicit pattern could not be compiled.
	#[error("Malformed route '{template}': {reason}")]
	MalformedRoute {
		/// The declared route template.
		template: String,
		/// Why compilation failed.
		reason: String,
	},

	/// A URL was requested for a target that cannot be expressed.
	#[error("Cannot build a URL for module '{module}' and controller '{controller}'")]
	UnresolvableTarget {
		/// Requested module.
		module: String,
		/// Requested controller.
		controller: String,
	},

	/// No handler was registered for the request method.
	#[error("Method not implemented: {0}")]
	NotImplemented(String),

	/// Unknown HTTP method token.
	#[error("Unsupported HTTP method: {0}")]
	UnsupportedMethod(String),

	/// The cache store rejected an operation.
	#[error("Cache error: {0}")]
	Cache(String),

	/// Cached data could not be encoded or decoded.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The request could not be built.
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	/// Controller enumeration failed.
	#[error("Controller discovery failed: {0}")]
	Discovery(String),
}

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
