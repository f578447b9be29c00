//! Settings errors.

use std::path::PathBuf;
use thiserror::Error;
use waymark_urls::RewriteError;

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised while loading or applying settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to read settings file {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid rewrite rule: {0}")]
	Rewrite(#[from] RewriteError),

	#[error("invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
}
