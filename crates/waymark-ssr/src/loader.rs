//! Module resolution.

use crate::error::{BoxError, SsrError, SsrResult};
use crate::module::PageModule;
use crate::result::PageSourceResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// External collaborator that knows which page modules exist and loads them.
#[async_trait]
pub trait ModuleSource: Send + Sync {
	/// Returns whether a module named `name` exists.
	fn exists(&self, name: &str) -> bool;

	/// Loads a module synchronously.
	fn load_sync(&self, name: &str) -> Result<Arc<dyn PageModule>, BoxError>;

	/// Loads a module asynchronously. Defaults to [`load_sync`](Self::load_sync).
	async fn load_async(&self, name: &str) -> Result<Arc<dyn PageModule>, BoxError> {
		self.load_sync(name)
	}
}

/// A [`ModuleSource`] backed by a name to module map.
#[derive(Clone, Default)]
pub struct InMemoryModuleSource {
	modules: HashMap<String, Arc<dyn PageModule>>,
}

impl fmt::Debug for InMemoryModuleSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.modules.keys().collect();
		names.sort();
		f.debug_struct("InMemoryModuleSource")
			.field("modules", &names)
			.finish()
	}
}

impl InMemoryModuleSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `module` under `name`, replacing any previous module.
	pub fn register(&mut self, name: impl Into<String>, module: impl PageModule + 'static) -> &mut Self {
		self.register_shared(name, Arc::new(module))
	}

	/// Registers a module that is already shared elsewhere.
	pub fn register_shared(&mut self, name: impl Into<String>, module: Arc<dyn PageModule>) -> &mut Self {
		self.modules.insert(name.into(), module);
		self
	}

	pub fn with_module(mut self, name: impl Into<String>, module: impl PageModule + 'static) -> Self {
		self.register(name, module);
		self
	}

	pub fn len(&self) -> usize {
		self.modules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

#[async_trait]
impl ModuleSource for InMemoryModuleSource {
	fn exists(&self, name: &str) -> bool {
		self.modules.contains_key(name)
	}

	fn load_sync(&self, name: &str) -> Result<Arc<dyn PageModule>, BoxError> {
		self.modules
			.get(name)
			.cloned()
			.ok_or_else(|| format!("module '{}' is not registered", name).into())
	}
}

/// Tag of a [`LoadResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
	NotFound,
	Success,
}

/// Outcome of [`ModuleLoader::load`].
pub enum LoadResult {
	/// The module does not exist. `not_found` is a ready
	/// [`PageSourceResult::NotFound`].
	NotFound { not_found: PageSourceResult },
	Success { module: Arc<dyn PageModule> },
}

impl fmt::Debug for LoadResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotFound { not_found } => f
				.debug_struct("NotFound")
				.field("not_found", not_found)
				.finish(),
			Self::Success { .. } => f.debug_struct("Success").finish_non_exhaustive(),
		}
	}
}

impl LoadResult {
	pub fn status(&self) -> LoadStatus {
		match self {
			Self::NotFound { .. } => LoadStatus::NotFound,
			Self::Success { .. } => LoadStatus::Success,
		}
	}
}

/// Resolves module names through a [`ModuleSource`].
#[derive(Clone)]
pub struct ModuleLoader {
	source: Arc<dyn ModuleSource>,
}

impl fmt::Debug for ModuleLoader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModuleLoader").finish_non_exhaustive()
	}
}

impl ModuleLoader {
	pub fn new(source: Arc<dyn ModuleSource>) -> Self {
		Self { source }
	}

	/// Loads `name`.
	///
	/// A missing module is a normal [`LoadResult::NotFound`], never an error.
	///
	/// # Errors
	///
	/// Returns [`SsrError::ModuleLoad`] when the source reports the module as
	/// present but fails to load it.
	pub async fn load(&self, name: &str) -> SsrResult<LoadResult> {
		if !self.source.exists(name) {
			tracing::debug!(module = name, "page module not found");
			return Ok(LoadResult::NotFound {
				not_found: PageSourceResult::NotFound {
					error: SsrError::NotFound {
						module: name.to_string(),
					},
				},
			});
		}

		let module = self
			.source
			.load_async(name)
			.await
			.map_err(|source| SsrError::ModuleLoad {
				module: name.to_string(),
				source,
			})?;
		Ok(LoadResult::Success { module })
	}
}
