//! Explicit navigation history.
//!
//! [`WindowHistory`] owns its entries instead of delegating to a host
//! history object, so navigation can be driven and inspected
//! deterministically. A host API, when one exists, is attached as a
//! [`HistoryAdapter`] that mirrors the current entry after every change.

use crate::error::HistoryError;
use crate::location::{Location, WindowLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
	/// Opaque application payload.
	pub state: Value,
	/// URL of the entry.
	pub url: String,
	/// Title of the entry.
	pub title: String,
}

impl HistoryState {
	/// Creates an entry with a null payload and empty title.
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			state: Value::Null,
			url: url.into(),
			title: String::new(),
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

/// Kind of history change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
	Push,
	Replace,
	Back,
	Forward,
}

/// Notification sent to subscribers after each history change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEvent {
	pub kind: NavigationType,
	/// URL applied to the location.
	pub url: String,
}

/// Mirrors history changes into a host history mechanism.
pub trait HistoryAdapter {
	/// Called once per change with the entry now current.
	fn mirror(&mut self, entry: &HistoryState, navigation: NavigationType);
}

type Listener = Box<dyn FnMut(&HistoryEvent)>;

/// An ordered stack of [`HistoryState`] entries layered over a [`Location`].
///
/// Every operation updates the location exactly once with the URL of the
/// entry that becomes current.
pub struct WindowHistory<L: Location = WindowLocation> {
	location: L,
	entries: Vec<HistoryState>,
	cursor: usize,
	listeners: Vec<Listener>,
	adapter: Option<Box<dyn HistoryAdapter>>,
}

impl<L: Location + fmt::Debug> fmt::Debug for WindowHistory<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WindowHistory")
			.field("location", &self.location)
			.field("entries", &self.entries)
			.field("cursor", &self.cursor)
			.field("listeners", &self.listeners.len())
			.field("has_adapter", &self.adapter.is_some())
			.finish()
	}
}

impl Default for WindowHistory<WindowLocation> {
	fn default() -> Self {
		Self::new(WindowLocation::default())
	}
}

impl<L: Location> WindowHistory<L> {
	/// Creates an empty history over `location`.
	pub fn new(location: L) -> Self {
		Self {
			location,
			entries: Vec::new(),
			cursor: 0,
			listeners: Vec::new(),
			adapter: None,
		}
	}

	/// Attaches a host history mirror.
	pub fn with_adapter(mut self, adapter: impl HistoryAdapter + 'static) -> Self {
		self.adapter = Some(Box::new(adapter));
		self
	}

	pub fn location(&self) -> &L {
		&self.location
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns all entries, oldest first, including those past the cursor.
	pub fn entries(&self) -> &[HistoryState] {
		&self.entries
	}

	/// Returns the current entry, if any push has happened.
	pub fn current(&self) -> Option<&HistoryState> {
		self.entries.get(self.cursor)
	}

	pub fn can_go_back(&self) -> bool {
		self.cursor > 0
	}

	pub fn can_go_forward(&self) -> bool {
		self.cursor + 1 < self.entries.len()
	}

	/// Registers a listener called after every change.
	pub fn subscribe(&mut self, listener: impl FnMut(&HistoryEvent) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	/// Drops entries after the cursor and appends a new current entry.
	pub fn push_state(&mut self, state: Value, title: &str, url: &str) {
		if !self.entries.is_empty() {
			self.entries.truncate(self.cursor + 1);
		}
		self.entries
			.push(HistoryState::new(url).with_state(state).with_title(title));
		self.cursor = self.entries.len() - 1;
		self.commit(NavigationType::Push);
	}

	/// Replaces the current entry, or appends one if the history is empty.
	pub fn replace_state(&mut self, state: Value, title: &str, url: &str) {
		let entry = HistoryState::new(url).with_state(state).with_title(title);
		match self.entries.get_mut(self.cursor) {
			Some(current) => *current = entry,
			None => {
				self.entries.push(entry);
				self.cursor = 0;
			}
		}
		self.commit(NavigationType::Replace);
	}

	/// Moves to the previous entry.
	///
	/// With a single entry the sequence is unchanged, but its URL is applied
	/// again and subscribers are still notified.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::Empty`] if nothing was ever pushed.
	pub fn back(&mut self) -> Result<(), HistoryError> {
		if self.entries.is_empty() {
			return Err(HistoryError::Empty);
		}
		self.cursor = self.cursor.saturating_sub(1);
		self.commit(NavigationType::Back);
		Ok(())
	}

	/// Moves to the next entry.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::Empty`] if nothing was ever pushed, or
	/// [`HistoryError::AtLatestEntry`] when already on the newest entry.
	pub fn forward(&mut self) -> Result<(), HistoryError> {
		if self.entries.is_empty() {
			return Err(HistoryError::Empty);
		}
		if !self.can_go_forward() {
			return Err(HistoryError::AtLatestEntry);
		}
		self.cursor += 1;
		self.commit(NavigationType::Forward);
		Ok(())
	}

	fn commit(&mut self, kind: NavigationType) {
		let Some(entry) = self.entries.get(self.cursor) else {
			return;
		};

		self.location.update(&entry.url);
		if let Some(adapter) = self.adapter.as_mut() {
			adapter.mirror(entry, kind);
		}
		tracing::debug!(?kind, url = %entry.url, cursor = self.cursor, "history changed");

		let event = HistoryEvent {
			kind,
			url: entry.url.clone(),
		};
		for listener in &mut self.listeners {
			listener(&event);
		}
	}
}
