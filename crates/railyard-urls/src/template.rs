//! Route template mini-language.
//!
//! A template describes a URL shape for both directions:
//!
//! - `{$name}`: required placeholder
//! - `{$name?}`: optional placeholder; a `/` right before it belongs to the
//!   optional part, so `/blog{/$page?}`-style double slashes never appear
//! - `(.*)` or `*`: wildcard, matched on the way in and dropped on the way out
//! - anything else is literal text
//!
//! Templates are parsed once into [`Segment`]s. The matcher regex and the
//! URL generator are both derived from that list.

use crate::encoding::encode_segment;
use crate::param_type::{DEFAULT_CAPTURE_CLASS, ParamType};
use indexmap::IndexMap;
use railyard_core::exception::{Error, Result};
use std::fmt;

/// Maximum allowed length for a route template in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	Required(String),
	Optional {
		name: String,
		/// The `/` before the placeholder is emitted only with a value.
		leading_slash: bool,
	},
	Wildcard,
}

/// A parsed route template.
///
/// # Examples
///
/// ```
/// use railyard_urls::RouteTemplate;
/// use indexmap::IndexMap;
///
/// let template = RouteTemplate::parse("/blog/{$id}/{$page?}").unwrap();
/// assert!(template.is_dynamic());
///
/// let mut values = IndexMap::new();
/// values.insert("id".to_string(), "7".to_string());
/// assert_eq!(template.generate(&values), "/blog/7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
	source: String,
	segments: Vec<Segment>,
}

impl RouteTemplate {
	/// Parses a template.
	///
	/// # Errors
	///
	/// Returns [`Error::MalformedRoute`] for an unclosed placeholder, an
	/// invalid placeholder name or a template over 1024 bytes.
	pub fn parse(template: &str) -> Result<Self> {
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(malformed(
				template,
				format!(
					"length {} exceeds maximum allowed length of {} bytes",
					template.len(),
					MAX_TEMPLATE_LENGTH
				),
			));
		}

		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut rest = template;

		while !rest.is_empty() {
			if let Some(after) = rest.strip_prefix("{$") {
				let end = after
					.find('}')
					.ok_or_else(|| malformed(template, "unclosed placeholder"))?;
				let body = &after[..end];
				let (name, optional) = match body.strip_suffix('?') {
					Some(name) => (name, true),
					None => (body, false),
				};
				validate_name(template, name)?;

				let leading_slash = optional && literal.ends_with('/');
				if leading_slash {
					literal.pop();
				}
				flush_literal(&mut literal, &mut segments);

				if optional {
					segments.push(Segment::Optional {
						name: name.to_string(),
						leading_slash,
					});
				} else {
					segments.push(Segment::Required(name.to_string()));
				}
				rest = &after[end + 1..];
			} else if let Some(after) = rest.strip_prefix("(.*)") {
				flush_literal(&mut literal, &mut segments);
				segments.push(Segment::Wildcard);
				rest = after;
			} else if let Some(after) = rest.strip_prefix('*') {
				flush_literal(&mut literal, &mut segments);
				segments.push(Segment::Wildcard);
				rest = after;
			} else {
				let mut chars = rest.chars();
				if let Some(ch) = chars.next() {
					literal.push(ch);
				}
				rest = chars.as_str();
			}
		}
		flush_literal(&mut literal, &mut segments);

		Ok(Self {
			source: template.to_string(),
			segments,
		})
	}

	/// The template as declared.
	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Whether the template has at least one placeholder.
	pub fn is_dynamic(&self) -> bool {
		self.placeholders().next().is_some()
	}

	/// Placeholder names in declaration order.
	pub fn placeholders(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(|segment| match segment {
			Segment::Required(name) | Segment::Optional { name, .. } => Some(name.as_str()),
			_ => None,
		})
	}

	pub fn has_placeholder(&self, name: &str) -> bool {
		self.placeholders().any(|placeholder| placeholder == name)
	}

	/// Builds the anchored regex source for this template.
	///
	/// Each placeholder captures the class of its declared type; undeclared
	/// placeholders capture a single path segment. A trailing slash on the
	/// path is accepted whether or not the template ends with one.
	pub fn to_regex(&self, params: &IndexMap<String, ParamType>) -> String {
		let class_for = |name: &str| {
			params
				.get(name)
				.map(ParamType::capture_class)
				.unwrap_or(DEFAULT_CAPTURE_CLASS)
		};

		let mut regex_str = String::from("^");
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => regex_str.push_str(&regex::escape(text)),
				Segment::Required(name) => {
					regex_str.push_str(&format!("(?P<{}>{})", name, class_for(name)));
				}
				Segment::Optional {
					name,
					leading_slash: true,
				} => {
					regex_str.push_str(&format!("(?:/(?P<{}>{}))?", name, class_for(name)));
				}
				Segment::Optional {
					name,
					leading_slash: false,
				} => {
					regex_str.push_str(&format!("(?P<{}>{})?", name, class_for(name)));
				}
				Segment::Wildcard => regex_str.push_str(".*"),
			}
		}
		if !regex_str.ends_with('/') {
			regex_str.push_str("/?");
		}
		regex_str.push('$');
		regex_str
	}

	/// Fills the template with `values`.
	///
	/// Values are percent-encoded. Unfilled placeholders and wildcards are
	/// dropped and repeated slashes are collapsed.
	pub fn generate(&self, values: &IndexMap<String, String>) -> String {
		let mut path = String::with_capacity(self.source.len());

		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => path.push_str(text),
				Segment::Required(name) => match values.get(name) {
					Some(value) => path.push_str(&encode_segment(value)),
					None => {
						tracing::debug!(
							template = %self.source,
							placeholder = %name,
							"required placeholder left unfilled"
						);
					}
				},
				Segment::Optional {
					name,
					leading_slash,
				} => {
					if let Some(value) = values.get(name) {
						if *leading_slash {
							path.push('/');
						}
						path.push_str(&encode_segment(value));
					}
				}
				Segment::Wildcard => {}
			}
		}

		collapse_slashes(&path)
	}
}

impl fmt::Display for RouteTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
	if !literal.is_empty() {
		segments.push(Segment::Literal(std::mem::take(literal)));
	}
}

// Names become regex group names.
fn validate_name(template: &str, name: &str) -> Result<()> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) => {
			(first.is_ascii_alphabetic() || first == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		None => false,
	};
	if valid {
		Ok(())
	} else {
		Err(malformed(
			template,
			format!("invalid placeholder name '{}'", name),
		))
	}
}

pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Error {
	Error::MalformedRoute {
		template: template.to_string(),
		reason: reason.into(),
	}
}

pub(crate) fn collapse_slashes(path: &str) -> String {
	let mut collapsed = String::with_capacity(path.len());
	for ch in path.chars() {
		if ch == '/' && collapsed.ends_with('/') {
			continue;
		}
		collapsed.push(ch);
	}
	collapsed
}
