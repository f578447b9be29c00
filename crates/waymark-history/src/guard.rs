//! Navigation guards.
//!
//! A mounted page registers a predicate that may veto a navigation, for
//! example while a form has unsaved changes. Registrations are keyed by the
//! returned [`GuardHandle`]; the owner string only groups guards so a page
//! can drop all of its guards at teardown.

use std::collections::BTreeMap;
use std::fmt;

/// Opaque handle identifying one registered guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuardHandle(u64);

struct Guard {
	owner: String,
	predicate: Box<dyn Fn() -> bool>,
}

/// Registry of navigation veto callbacks.
#[derive(Default)]
pub struct GuardRegistry {
	guards: BTreeMap<GuardHandle, Guard>,
	next_id: u64,
}

impl fmt::Debug for GuardRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let owners: Vec<_> = self.guards.values().map(|g| g.owner.as_str()).collect();
		f.debug_struct("GuardRegistry")
			.field("owners", &owners)
			.finish()
	}
}

impl GuardRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `predicate` for `owner`. Returning `false` vetoes navigation.
	pub fn add_route<F>(&mut self, owner: impl Into<String>, predicate: F) -> GuardHandle
	where
		F: Fn() -> bool + 'static,
	{
		let handle = GuardHandle(self.next_id);
		self.next_id += 1;
		self.guards.insert(
			handle,
			Guard {
				owner: owner.into(),
				predicate: Box::new(predicate),
			},
		);
		handle
	}

	/// Removes one guard. Returns `false` if the handle was already removed.
	pub fn remove_route(&mut self, handle: GuardHandle) -> bool {
		self.guards.remove(&handle).is_some()
	}

	/// Removes every guard registered by `owner` and returns how many.
	pub fn remove_owner(&mut self, owner: &str) -> usize {
		let before = self.guards.len();
		self.guards.retain(|_, guard| guard.owner != owner);
		before - self.guards.len()
	}

	pub fn len(&self) -> usize {
		self.guards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.guards.is_empty()
	}

	/// Invokes every predicate and returns `true` only if none vetoed.
	///
	/// All predicates run even after the first veto.
	pub fn allows_navigation(&self) -> bool {
		let vetoes: Vec<&str> = self
			.guards
			.values()
			.filter(|guard| !(guard.predicate)())
			.map(|guard| guard.owner.as_str())
			.collect();

		if vetoes.is_empty() {
			true
		} else {
			tracing::debug!(?vetoes, "navigation vetoed by guard");
			false
		}
	}
}
