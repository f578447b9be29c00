//! Client-side router facade.

use crate::error::{HistoryError, RouterError};
use crate::guard::{GuardHandle, GuardRegistry};
use crate::history::{HistoryEvent, WindowHistory};
use crate::location::{Location, WindowLocation};
use crate::router_url::RouterUrl;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use waymark_urls::{Mask, ParamsMap};

/// Options for [`Router::navigate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
	/// Replace the current entry instead of pushing a new one.
	pub replace: bool,
	pub state: Value,
	pub title: String,
}

impl NavigateOptions {
	/// Options for a push navigation.
	pub fn push() -> Self {
		Self::default()
	}

	/// Options for a replace navigation.
	pub fn replace() -> Self {
		Self {
			replace: true,
			..Self::default()
		}
	}

	pub fn with_state(mut self, state: Value) -> Self {
		self.state = state;
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
	/// History and location were updated.
	Committed,
	/// A guard vetoed; nothing changed.
	Blocked,
}

impl Navigation {
	pub fn is_committed(self) -> bool {
		matches!(self, Self::Committed)
	}
}

/// Handle returned by [`Router::watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchHandle(u64);

struct Watcher {
	mask: Mask,
	last: ParamsMap,
	callback: Box<dyn FnMut(&ParamsMap)>,
}

/// Navigation facade over [`WindowHistory`], [`RouterUrl`] and
/// [`GuardRegistry`].
///
/// Every navigation consults the guards first. A vetoed navigation leaves
/// history, location and watchers untouched.
///
/// ```
/// use waymark_history::{NavigateOptions, Router};
///
/// let mut router: Router = Router::default();
/// router.navigate("/users/1", NavigateOptions::push());
/// router.navigate("/users/2", NavigateOptions::push());
/// router.back().unwrap();
/// assert_eq!(router.current_url(), "/users/1");
/// ```
pub struct Router<L: Location = WindowLocation> {
	history: WindowHistory<L>,
	url: RouterUrl,
	guards: GuardRegistry,
	watchers: BTreeMap<WatchHandle, Watcher>,
	next_watch: u64,
}

impl<L: Location + fmt::Debug> fmt::Debug for Router<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let masks: Vec<_> = self.watchers.values().map(|w| w.mask.as_str()).collect();
		f.debug_struct("Router")
			.field("history", &self.history)
			.field("url", &self.url)
			.field("guards", &self.guards)
			.field("watchers", &masks)
			.finish()
	}
}

impl Default for Router<WindowLocation> {
	fn default() -> Self {
		Self::new(WindowHistory::default(), RouterUrl::default())
	}
}

impl<L: Location> Router<L> {
	pub fn new(history: WindowHistory<L>, url: RouterUrl) -> Self {
		Self {
			history,
			url,
			guards: GuardRegistry::new(),
			watchers: BTreeMap::new(),
			next_watch: 0,
		}
	}

	pub fn history(&self) -> &WindowHistory<L> {
		&self.history
	}

	pub fn router_url(&self) -> &RouterUrl {
		&self.url
	}

	/// Registers a listener on the underlying history.
	pub fn subscribe(&mut self, listener: impl FnMut(&HistoryEvent) + 'static) {
		self.history.subscribe(listener);
	}

	/// Pushes or replaces `url` unless a guard vetoes.
	pub fn navigate(&mut self, url: &str, options: NavigateOptions) -> Navigation {
		if !self.guards.allows_navigation() {
			tracing::debug!(url, "navigation blocked");
			return Navigation::Blocked;
		}

		if options.replace {
			self.history
				.replace_state(options.state, &options.title, url);
		} else {
			self.history.push_state(options.state, &options.title, url);
		}
		self.notify_watchers();
		Navigation::Committed
	}

	/// Moves back one entry unless a guard vetoes.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::Empty`] if nothing has been navigated to.
	pub fn back(&mut self) -> Result<Navigation, RouterError> {
		if self.history.is_empty() {
			return Err(HistoryError::Empty.into());
		}
		if !self.guards.allows_navigation() {
			return Ok(Navigation::Blocked);
		}
		self.history.back()?;
		self.notify_watchers();
		Ok(Navigation::Committed)
	}

	/// Moves forward one entry unless a guard vetoes.
	///
	/// # Errors
	///
	/// Returns a [`HistoryError`] if there is no later entry.
	pub fn forward(&mut self) -> Result<Navigation, RouterError> {
		if self.history.is_empty() {
			return Err(HistoryError::Empty.into());
		}
		if !self.history.can_go_forward() {
			return Err(HistoryError::AtLatestEntry.into());
		}
		if !self.guards.allows_navigation() {
			return Ok(Navigation::Blocked);
		}
		self.history.forward()?;
		self.notify_watchers();
		Ok(Navigation::Committed)
	}

	/// The URL consumers should treat as current: the state URL if one is
	/// set, otherwise the location.
	pub fn current_url(&self) -> String {
		self.url.state_url(self.history.location())
	}

	/// The location's URL, ignoring any state URL.
	pub fn actual_url(&self) -> String {
		self.url.url(self.history.location())
	}

	pub fn service_url(&self, url: &str) -> String {
		self.url.service_url(url)
	}

	pub fn external_url(&self, url: &str) -> String {
		self.url.external_url(url)
	}

	pub fn set_state_url(&mut self, url: impl Into<String>) {
		self.url.set_state_url(url);
		self.notify_watchers();
	}

	pub fn reset_state_url(&mut self) {
		self.url.reset_state_url();
		self.notify_watchers();
	}

	pub fn add_route<F>(&mut self, owner: impl Into<String>, predicate: F) -> GuardHandle
	where
		F: Fn() -> bool + 'static,
	{
		self.guards.add_route(owner, predicate)
	}

	pub fn remove_route(&mut self, handle: GuardHandle) -> bool {
		self.guards.remove_route(handle)
	}

	pub fn remove_owner(&mut self, owner: &str) -> usize {
		self.guards.remove_owner(owner)
	}

	/// Resolves `mask` against [`current_url`](Self::current_url).
	pub fn params(&self, mask: &Mask) -> ParamsMap {
		mask.resolve(&self.current_url())
	}

	/// Calls `callback` whenever the parameters `mask` resolves to change.
	///
	/// The callback is not invoked for the parameters current at
	/// registration time.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Mask`] if `mask` is malformed.
	pub fn watch<F>(&mut self, mask: &str, callback: F) -> Result<WatchHandle, RouterError>
	where
		F: FnMut(&ParamsMap) + 'static,
	{
		let mask = Mask::parse(mask)?;
		let last = self.params(&mask);
		let handle = WatchHandle(self.next_watch);
		self.next_watch += 1;
		self.watchers.insert(
			handle,
			Watcher {
				mask,
				last,
				callback: Box::new(callback),
			},
		);
		Ok(handle)
	}

	pub fn unwatch(&mut self, handle: WatchHandle) -> bool {
		self.watchers.remove(&handle).is_some()
	}

	fn notify_watchers(&mut self) {
		let current = self.current_url();
		for watcher in self.watchers.values_mut() {
			let params = watcher.mask.resolve(&current);
			if params == watcher.last {
				continue;
			}
			tracing::trace!(
				mask = %watcher.mask,
				changed = ?watcher.last.changed_keys(&params),
				"mask parameters changed"
			);
			watcher.last = params;
			(watcher.callback)(&watcher.last);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[rstest]
	fn test_navigate_push_and_replace() {
		let mut router: Router = Router::default();
		router.navigate("/a", NavigateOptions::push());
		router.navigate("/b", NavigateOptions::replace().with_title("B"));

		assert_eq!(router.history().len(), 1);
		assert_eq!(router.current_url(), "/b");
		assert_eq!(router.history().current().unwrap().title, "B");
	}

	#[rstest]
	fn test_state_payload_is_stored() {
		let mut router: Router = Router::default();
		router.navigate("/a", NavigateOptions::push().with_state(json!({"k": 1})));
		assert_eq!(router.history().current().unwrap().state, json!({"k": 1}));
	}

	#[rstest]
	fn test_guard_blocks_navigation() {
		let mut router: Router = Router::default();
		router.navigate("/start", NavigateOptions::push());
		router.add_route("editor", || false);

		assert_eq!(router.navigate("/next", NavigateOptions::push()), Navigation::Blocked);
		assert_eq!(router.current_url(), "/start");
		assert_eq!(router.history().len(), 1);
	}

	#[rstest]
	fn test_guard_blocks_back() {
		let mut router: Router = Router::default();
		router.navigate("/a", NavigateOptions::push());
		router.navigate("/b", NavigateOptions::push());
		let handle = router.add_route("editor", || false);

		assert_eq!(router.back().unwrap(), Navigation::Blocked);
		assert_eq!(router.current_url(), "/b");

		router.remove_route(handle);
		assert_eq!(router.back().unwrap(), Navigation::Committed);
		assert_eq!(router.current_url(), "/a");
	}

	#[rstest]
	fn test_back_and_forward_errors() {
		let mut router: Router = Router::default();
		assert_eq!(router.back(), Err(RouterError::History(HistoryError::Empty)));

		router.navigate("/a", NavigateOptions::push());
		assert_eq!(
			router.forward(),
			Err(RouterError::History(HistoryError::AtLatestEntry))
		);
	}

	#[rstest]
	fn test_state_url_survives_navigation() {
		let mut router: Router = Router::default();
		router.navigate("/a", NavigateOptions::push());
		router.set_state_url("/draft");
		router.navigate("/b", NavigateOptions::push());

		assert_eq!(router.current_url(), "/draft");
		assert_eq!(router.actual_url(), "/b");

		router.reset_state_url();
		assert_eq!(router.current_url(), "/b");
	}

	#[rstest]
	fn test_watch_fires_only_on_change() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut router: Router = Router::default();
		router.navigate("/users/1", NavigateOptions::push());

		let sink = Rc::clone(&seen);
		router
			.watch("/users/:id", move |params| {
				sink.borrow_mut()
					.push(params.get("id").map(str::to_string));
			})
			.unwrap();

		router.navigate("/users/1?tab=x", NavigateOptions::push());
		router.navigate("/users/2", NavigateOptions::push());
		router.back().unwrap();

		assert_eq!(
			*seen.borrow(),
			vec![Some("2".to_string()), Some("1".to_string())]
		);
	}

	#[rstest]
	fn test_watch_rejects_malformed_mask() {
		let mut router: Router = Router::default();
		let result = router.watch("/:a/:a", |_| {});
		assert!(matches!(result, Err(RouterError::Mask(_))));
	}

	#[rstest]
	fn test_unwatch() {
		let count = Rc::new(RefCell::new(0));
		let mut router: Router = Router::default();
		let sink = Rc::clone(&count);
		let handle = router
			.watch("/p/:id", move |_| *sink.borrow_mut() += 1)
			.unwrap();

		router.navigate("/p/1", NavigateOptions::push());
		assert!(router.unwatch(handle));
		router.navigate("/p/2", NavigateOptions::push());

		assert_eq!(*count.borrow(), 1);
	}

	#[rstest]
	fn test_params_follow_state_url() {
		let mask = Mask::parse("/p/:id").unwrap();
		let mut router: Router = Router::default();
		router.navigate("/p/1", NavigateOptions::push());
		router.set_state_url("/p/9");
		assert_eq!(router.params(&mask).get("id"), Some("9"));
	}
}
