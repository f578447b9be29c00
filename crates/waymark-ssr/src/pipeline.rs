//! Request to page source.

use crate::data::DataToRender;
use crate::error::SsrError;
use crate::loader::{LoadResult, ModuleLoader, ModuleSource};
use crate::module::ServerRouter;
use crate::page_source::{PageSource, RenderData, RenderOptions, Renderer};
use crate::result::PageSourceResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use waymark_urls::{RewriteDirection, UrlParts, UrlRewriter};

/// Module served for the application root.
pub const DEFAULT_INDEX_MODULE: &str = "index";

/// An incoming page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
	pub url: String,
}

impl PageRequest {
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into() }
	}
}

/// Chains module resolution, data loading and rendering.
///
/// Holds only shared, immutable collaborators; every call to
/// [`get_page_source`](Self::get_page_source) builds its own request state,
/// so one pipeline can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PagePipeline {
	loader: ModuleLoader,
	page_source: PageSource,
	rewriter: Arc<UrlRewriter>,
	index_module: String,
}

impl PagePipeline {
	pub fn new(source: Arc<dyn ModuleSource>, renderer: Arc<dyn Renderer>, rewriter: Arc<UrlRewriter>) -> Self {
		Self {
			loader: ModuleLoader::new(source),
			page_source: PageSource::new(renderer),
			rewriter,
			index_module: DEFAULT_INDEX_MODULE.to_string(),
		}
	}

	pub fn with_index_module(mut self, name: impl Into<String>) -> Self {
		self.index_module = name.into();
		self
	}

	pub fn index_module(&self) -> &str {
		&self.index_module
	}

	pub fn rewriter(&self) -> &Arc<UrlRewriter> {
		&self.rewriter
	}

	/// Maps a request URL to a module name.
	///
	/// The path is rewritten to its internal form and stripped of surrounding
	/// slashes; the root maps to the index module.
	pub fn module_name(&self, url: &str) -> String {
		let path = UrlParts::new(url).path().to_string();
		let internal = self.rewriter.get(&path, RewriteDirection::ToInternal);
		let name = internal.trim_matches('/');
		if name.is_empty() {
			self.index_module.clone()
		} else {
			name.to_string()
		}
	}

	/// Serves one request.
	///
	/// `options.url` and `options.module_name` are filled in from the
	/// request. Callbacks follow [`PageSource::render`]; a module that fails
	/// to load produces an `Error` result without calling either.
	pub async fn get_page_source<S, N>(
		&self,
		mut options: RenderOptions,
		request: &PageRequest,
		on_success: S,
		on_not_found: N,
	) -> PageSourceResult
	where
		S: FnOnce(&str) + Send,
		N: FnOnce(&SsrError) + Send,
	{
		let module_name = self.module_name(&request.url);
		options.url = request.url.clone();
		options.module_name = module_name.clone();

		let render_data = match self.loader.load(&module_name).await {
			Ok(LoadResult::NotFound { not_found }) => RenderData::NoData {
				error: not_found.into_error().unwrap_or(SsrError::NotFound {
					module: module_name,
				}),
			},
			Ok(LoadResult::Success { module }) => {
				let router = ServerRouter::new(request.url.as_str(), module_name.as_str(), Arc::clone(&self.rewriter));
				let data = DataToRender::get(module.as_ref(), &request.url, &module_name, &router);
				RenderData::Data {
					data_to_render: data.into_future(),
				}
			}
			Err(error) => {
				tracing::warn!(url = %request.url, error = %error, "page module failed to load");
				return PageSourceResult::Error { error };
			}
		};

		self.page_source
			.render(options, render_data, on_success, on_not_found)
			.await
	}
}
