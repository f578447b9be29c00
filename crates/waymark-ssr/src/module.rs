//! Page module capabilities.
//!
//! A loaded page module may expose a data loader in one of two places: on
//! its default export or on the module itself. Both are probed through the
//! [`PageModule`] and [`PageExport`] traits; a module that implements
//! neither hook simply has no page data.

use crate::error::BoxError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use waymark_urls::{Mask, ParamsMap, UrlRewriter};

/// Options passed to every data loader call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOptions {
	/// Whether the call happens during static prerendering. Always `false`
	/// for live requests.
	pub prerender: bool,
}

/// Read-only routing context handed to data loaders.
#[derive(Debug, Clone)]
pub struct ServerRouter {
	url: String,
	module_name: String,
	rewriter: Arc<UrlRewriter>,
}

impl ServerRouter {
	pub fn new(url: impl Into<String>, module_name: impl Into<String>, rewriter: Arc<UrlRewriter>) -> Self {
		Self {
			url: url.into(),
			module_name: module_name.into(),
			rewriter,
		}
	}

	/// The request URL as received.
	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn module_name(&self) -> &str {
		&self.module_name
	}

	pub fn rewriter(&self) -> &Arc<UrlRewriter> {
		&self.rewriter
	}

	/// Resolves `mask` against the request URL.
	pub fn params(&self, mask: &Mask) -> ParamsMap {
		mask.resolve(&self.url)
	}
}

/// What a data loader returns: a value now, or a future.
pub enum HookOutput {
	/// Data available synchronously. `None` means the loader produced nothing.
	Ready(Option<Value>),
	/// Data still being fetched.
	Pending(BoxFuture<'static, Result<Option<Value>, BoxError>>),
}

impl fmt::Debug for HookOutput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
			Self::Pending(_) => f.write_str("Pending(..)"),
		}
	}
}

/// The data-loading hook of a page module.
pub trait DataLoader: Send + Sync {
	/// Produces the data the page renders with.
	///
	/// A synchronous `Err` and a rejected [`HookOutput::Pending`] future are
	/// both reported as a data-load failure for this request only.
	fn get_data_to_render(
		&self,
		url: &str,
		options: DataOptions,
		router: &ServerRouter,
	) -> Result<HookOutput, BoxError>;
}

impl<F> DataLoader for F
where
	F: Fn(&str, DataOptions, &ServerRouter) -> Result<HookOutput, BoxError> + Send + Sync,
{
	fn get_data_to_render(
		&self,
		url: &str,
		options: DataOptions,
		router: &ServerRouter,
	) -> Result<HookOutput, BoxError> {
		self(url, options, router)
	}
}

/// Something that may carry a data loader.
pub trait PageExport: Send + Sync {
	fn data_loader(&self) -> Option<&dyn DataLoader> {
		None
	}
}

/// A loaded page module.
pub trait PageModule: PageExport {
	/// The module's default export, probed before the module itself.
	fn default_export(&self) -> Option<&dyn PageExport> {
		None
	}
}

/// A plain export holding an optional data loader.
#[derive(Clone, Default)]
pub struct ExportDef {
	loader: Option<Arc<dyn DataLoader>>,
}

impl fmt::Debug for ExportDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExportDef")
			.field("has_data_loader", &self.loader.is_some())
			.finish()
	}
}

impl ExportDef {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the data loader from a closure.
	pub fn with_data_loader<F>(self, loader: F) -> Self
	where
		F: Fn(&str, DataOptions, &ServerRouter) -> Result<HookOutput, BoxError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.with_loader(Arc::new(loader))
	}

	pub fn with_loader(mut self, loader: Arc<dyn DataLoader>) -> Self {
		self.loader = Some(loader);
		self
	}
}

impl PageExport for ExportDef {
	fn data_loader(&self) -> Option<&dyn DataLoader> {
		self.loader.as_deref()
	}
}

/// A page module assembled from closures.
///
/// ```
/// use waymark_ssr::{HookOutput, ModuleDef, PageExport, PageModule};
///
/// let module = ModuleDef::new().with_data_loader(|_url, _opts, _router| Ok(HookOutput::Ready(None)));
/// assert!(module.data_loader().is_some());
/// assert!(module.default_export().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleDef {
	namespace: ExportDef,
	default_export: Option<ExportDef>,
}

impl ModuleDef {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the loader on the module namespace.
	pub fn with_data_loader<F>(mut self, loader: F) -> Self
	where
		F: Fn(&str, DataOptions, &ServerRouter) -> Result<HookOutput, BoxError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.namespace = self.namespace.with_data_loader(loader);
		self
	}

	pub fn with_loader(mut self, loader: Arc<dyn DataLoader>) -> Self {
		self.namespace = self.namespace.with_loader(loader);
		self
	}

	pub fn with_default_export(mut self, export: ExportDef) -> Self {
		self.default_export = Some(export);
		self
	}
}

impl PageExport for ModuleDef {
	fn data_loader(&self) -> Option<&dyn DataLoader> {
		self.namespace.data_loader()
	}
}

impl PageModule for ModuleDef {
	fn default_export(&self) -> Option<&dyn PageExport> {
		self.default_export
			.as_ref()
			.map(|export| export as &dyn PageExport)
	}
}
