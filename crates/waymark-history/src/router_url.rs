//! The router's view of the current URL.

use crate::location::Location;
use std::sync::Arc;
use waymark_urls::{RewriteDirection, UrlRewriter};

/// Actual URL, optional state URL override, and service URL computation.
///
/// The actual URL always mirrors the [`Location`]. A state URL, once set,
/// takes precedence for consumers of [`state_url`](Self::state_url) until
/// [`reset_state_url`](Self::reset_state_url) is called; navigation does not
/// clear it.
#[derive(Debug, Clone, Default)]
pub struct RouterUrl {
	app_root: Option<String>,
	state_url: Option<String>,
	rewriter: Arc<UrlRewriter>,
}

impl RouterUrl {
	pub fn new(rewriter: Arc<UrlRewriter>) -> Self {
		Self {
			app_root: None,
			state_url: None,
			rewriter,
		}
	}

	/// Sets the deployment prefix used by [`service_url`](Self::service_url).
	pub fn with_app_root(mut self, app_root: impl Into<String>) -> Self {
		self.app_root = Some(app_root.into());
		self
	}

	pub fn app_root(&self) -> Option<&str> {
		self.app_root.as_deref()
	}

	pub fn rewriter(&self) -> &Arc<UrlRewriter> {
		&self.rewriter
	}

	/// Returns the full URL of `location`.
	pub fn url<L: Location>(&self, location: &L) -> String {
		location.href()
	}

	/// Returns the state URL if set, otherwise the location's URL.
	pub fn state_url<L: Location>(&self, location: &L) -> String {
		match &self.state_url {
			Some(url) => url.clone(),
			None => self.url(location),
		}
	}

	pub fn set_state_url(&mut self, url: impl Into<String>) {
		self.state_url = Some(url.into());
	}

	pub fn reset_state_url(&mut self) {
		self.state_url = None;
	}

	pub fn has_state_url(&self) -> bool {
		self.state_url.is_some()
	}

	/// Prefixes `url` with the application root. See [`service_url`].
	pub fn service_url(&self, url: &str) -> String {
		service_url(self.app_root.as_deref(), url)
	}

	/// Rewrites an internal path to its external form, then prefixes it.
	pub fn external_url(&self, url: &str) -> String {
		self.service_url(&self.rewriter.get(url, RewriteDirection::ToExternal))
	}
}

/// Joins `app_root` and `url` with exactly one `/` at the boundary.
///
/// A URL already inside the root is returned as is, so the operation is
/// idempotent. Without a root, or with `/`, the URL is only normalized to
/// start with a single `/`.
///
/// ```
/// use waymark_history::service_url;
///
/// assert_eq!(service_url(Some("/service/"), "users"), "/service/users");
/// assert_eq!(service_url(Some("service"), "/service/users"), "/service/users");
/// assert_eq!(service_url(None, "users"), "/users");
/// ```
pub fn service_url(app_root: Option<&str>, url: &str) -> String {
	let root = app_root.unwrap_or("").trim_matches('/');
	let path = format!("/{}", url.trim_start_matches('/'));
	if root.is_empty() {
		return path;
	}

	let within_root = path
		.strip_prefix('/')
		.and_then(|p| p.strip_prefix(root))
		.is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']));

	if within_root {
		path
	} else {
		format!("/{}{}", root, path)
	}
}
