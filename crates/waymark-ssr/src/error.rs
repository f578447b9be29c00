//! Error types for the server page pipeline.

use thiserror::Error;

/// Boxed error returned by collaborators: module sources, data loaders and
/// renderers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for pipeline operations.
pub type SsrResult<T> = Result<T, SsrError>;

/// Server pipeline errors.
///
/// Each error belongs to a single request. Only `NotFound` is an expected
/// outcome; the rest surface as an error page.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SsrError {
	/// No module exists under the resolved name.
	#[error("page module not found: {module}")]
	NotFound {
		/// Resolved module name.
		module: String,
	},

	/// The module source reported the module as present but failed to load it.
	#[error("failed to load page module '{module}': {source}")]
	ModuleLoad {
		/// Resolved module name.
		module: String,
		/// Error from the module source.
		#[source]
		source: BoxError,
	},

	/// The module's data loader failed or its future rejected.
	#[error("data loader for page module '{module}' failed: {source}")]
	DataLoad {
		/// Resolved module name.
		module: String,
		/// Error from the data loader.
		#[source]
		source: BoxError,
	},

	/// The renderer failed.
	#[error("rendering page module '{module}' failed: {source}")]
	Render {
		/// Resolved module name.
		module: String,
		/// Error from the renderer.
		#[source]
		source: BoxError,
	},
}

impl SsrError {
	/// Returns the module the error relates to.
	pub fn module(&self) -> &str {
		match self {
			Self::NotFound { module }
			| Self::ModuleLoad { module, .. }
			| Self::DataLoad { module, .. }
			| Self::Render { module, .. } => module,
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}
