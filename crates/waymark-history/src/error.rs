//! Error types for client-side navigation.

use thiserror::Error;
use waymark_urls::MaskError;

/// Errors from [`WindowHistory`](crate::WindowHistory) traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HistoryError {
	/// Traversal was requested before any entry was pushed.
	#[error("history is empty")]
	Empty,

	/// `forward()` was requested on the newest entry.
	#[error("already at the latest history entry")]
	AtLatestEntry,
}

/// Errors returned by the [`Router`](crate::Router) facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouterError {
	#[error(transparent)]
	History(#[from] HistoryError),

	#[error(transparent)]
	Mask(#[from] MaskError),
}
