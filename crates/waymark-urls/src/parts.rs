//! Raw URL decomposition.

use std::fmt;

/// A read-only split of a raw URL into path, query and fragment.
///
/// The first `#` starts the fragment; everything after it, including any
/// further `?` or `#`, belongs to the fragment verbatim. Within the part
/// before the `#`, the first `?` starts the query. Nothing is decoded.
///
/// # Examples
///
/// ```
/// use waymark_urls::UrlParts;
///
/// let parts = UrlParts::new("/path?query#fragment");
/// assert_eq!(parts.path(), "/path");
/// assert_eq!(parts.query(), "query");
/// assert_eq!(parts.fragment(), "fragment");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlParts {
	path: String,
	query: String,
	fragment: String,
}

impl UrlParts {
	/// Splits a raw URL string.
	pub fn new(url: &str) -> Self {
		let (before_fragment, fragment) = url.split_once('#').unwrap_or((url, ""));
		let (path, query) = before_fragment
			.split_once('?')
			.unwrap_or((before_fragment, ""));

		Self {
			path: path.to_string(),
			query: query.to_string(),
			fragment: fragment.to_string(),
		}
	}

	/// Returns the path component.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the query component without its leading `?`.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Returns the fragment component without its leading `#`.
	pub fn fragment(&self) -> &str {
		&self.fragment
	}

	/// Returns a copy with the path replaced, keeping query and fragment.
	pub fn with_path(&self, path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			query: self.query.clone(),
			fragment: self.fragment.clone(),
		}
	}

	/// Rebuilds the URL, omitting empty query and fragment components.
	pub fn to_url(&self) -> String {
		let mut url = self.path.clone();
		if !self.query.is_empty() {
			url.push('?');
			url.push_str(&self.query);
		}
		if !self.fragment.is_empty() {
			url.push('#');
			url.push_str(&self.fragment);
		}
		url
	}
}

impl From<&str> for UrlParts {
	fn from(url: &str) -> Self {
		Self::new(url)
	}
}

impl fmt::Display for UrlParts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_url())
	}
}
