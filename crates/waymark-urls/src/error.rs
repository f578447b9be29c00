//! Error types for mask parsing and URL rewriting.
//!
//! Matching never fails: a URL that does not fit a mask simply yields absent
//! parameter values. The errors below are raised while a route table is being
//! built, so a malformed definition is caught at startup.

use thiserror::Error;

/// Errors raised by [`Mask::parse`](crate::mask::Mask::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MaskError {
	/// The mask exceeds the maximum accepted length.
	#[error("mask length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum accepted length in bytes.
		max: usize,
	},

	/// A placeholder marker `:` is not followed by a name.
	#[error("empty placeholder name in mask '{mask}'")]
	EmptyPlaceholder {
		/// The offending mask.
		mask: String,
	},

	/// The same placeholder name appears twice, possibly in different zones.
	#[error("duplicate placeholder ':{name}' in mask '{mask}'")]
	DuplicatePlaceholder {
		/// Placeholder name without the leading `:`.
		name: String,
		/// The offending mask.
		mask: String,
	},
}

/// Errors raised by [`UrlRewriter::add_rule`](crate::rewrite::UrlRewriter::add_rule).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RewriteError {
	/// The pattern exceeds the maximum accepted length.
	#[error("pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum accepted length in bytes.
		max: usize,
	},

	/// A `regex:` segment failed to compile.
	#[error("invalid regex segment '{segment}' in pattern '{pattern}': {message}")]
	InvalidRegex {
		/// Full rule pattern.
		pattern: String,
		/// The segment that failed, including its `regex:` prefix.
		segment: String,
		/// Compiler message.
		message: String,
	},

	/// The target references a capture group the pattern does not define.
	#[error(
		"target '{target}' references ${index} but pattern '{pattern}' defines {captures} capture group(s)"
	)]
	UnknownCapture {
		/// Full rule pattern.
		pattern: String,
		/// Full rule target.
		target: String,
		/// Referenced group number.
		index: usize,
		/// Number of groups available in the pattern.
		captures: usize,
	},
}
