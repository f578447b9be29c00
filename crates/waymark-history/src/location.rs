//! The current URL snapshot.

use waymark_urls::UrlParts;

/// A mutable view of the current URL.
///
/// [`WindowHistory`](crate::WindowHistory) calls [`update`](Location::update)
/// once per navigation. Implementations only store the new snapshot; they do
/// not emit events.
pub trait Location {
	/// Replaces the snapshot with `raw_url`.
	fn update(&mut self, raw_url: &str);

	fn pathname(&self) -> &str;

	/// The query including its leading `?`, or an empty string.
	fn search(&self) -> &str;

	/// The fragment including its leading `#`, or an empty string.
	fn hash(&self) -> &str;

	/// The full URL: pathname, search and hash.
	fn href(&self) -> String {
		format!("{}{}{}", self.pathname(), self.search(), self.hash())
	}
}

/// In-process [`Location`] that splits URLs with [`UrlParts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLocation {
	pathname: String,
	search: String,
	hash: String,
}

impl WindowLocation {
	/// Creates a location already pointing at `raw_url`.
	pub fn new(raw_url: &str) -> Self {
		let mut location = Self::default();
		location.update(raw_url);
		location
	}
}

impl Location for WindowLocation {
	fn update(&mut self, raw_url: &str) {
		let parts = UrlParts::new(raw_url);
		self.pathname = parts.path().to_string();
		self.search = prefixed('?', parts.query());
		self.hash = prefixed('#', parts.fragment());
	}

	fn pathname(&self) -> &str {
		&self.pathname
	}

	fn search(&self) -> &str {
		&self.search
	}

	fn hash(&self) -> &str {
		&self.hash
	}
}

fn prefixed(delimiter: char, component: &str) -> String {
	if component.is_empty() {
		String::new()
	} else {
		format!("{}{}", delimiter, component)
	}
}
