//! Rendering and outcome classification.

use crate::data::DataFuture;
use crate::error::{BoxError, SsrError};
use crate::result::PageSourceResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Options handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
	/// Request URL.
	pub url: String,
	/// Resolved module name.
	pub module_name: String,
	/// Data produced by the module's data loader.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_config: Option<Value>,
	/// Caller-supplied options passed through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl RenderOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}
}

/// External collaborator producing markup for a page.
pub trait Renderer: Send + Sync {
	fn render(&self, options: &RenderOptions, page_config: Option<&Value>) -> Result<String, BoxError>;
}

impl<F> Renderer for F
where
	F: Fn(&RenderOptions, Option<&Value>) -> Result<String, BoxError> + Send + Sync,
{
	fn render(&self, options: &RenderOptions, page_config: Option<&Value>) -> Result<String, BoxError> {
		self(options, page_config)
	}
}

/// Wraps a closure as a shared [`Renderer`].
pub fn render_fn<F>(render: F) -> Arc<dyn Renderer>
where
	F: Fn(&RenderOptions, Option<&Value>) -> Result<String, BoxError> + Send + Sync + 'static,
{
	Arc::new(render)
}

/// Input to [`PageSource::render`].
pub enum RenderData {
	/// There is nothing to render, usually because the module is missing.
	NoData { error: SsrError },
	/// Page data still to be awaited.
	Data { data_to_render: DataFuture },
}

impl fmt::Debug for RenderData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NoData { error } => f.debug_struct("NoData").field("error", error).finish(),
			Self::Data { .. } => f.debug_struct("Data").finish_non_exhaustive(),
		}
	}
}

impl RenderData {
	pub fn has_data(&self) -> bool {
		matches!(self, Self::Data { .. })
	}
}

/// Awaits page data, renders, and classifies the outcome.
#[derive(Clone)]
pub struct PageSource {
	renderer: Arc<dyn Renderer>,
}

impl fmt::Debug for PageSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageSource").finish_non_exhaustive()
	}
}

impl PageSource {
	pub fn new(renderer: Arc<dyn Renderer>) -> Self {
		Self { renderer }
	}

	/// Produces the page for one request.
	///
	/// - no data: calls `on_not_found` and returns `NotFound`
	/// - data resolves and renders: calls `on_success` with the markup and
	///   returns `Ok`
	/// - data or render failure: returns `Error` without calling either
	///   callback
	pub async fn render<S, N>(
		&self,
		mut options: RenderOptions,
		render_data: RenderData,
		on_success: S,
		on_not_found: N,
	) -> PageSourceResult
	where
		S: FnOnce(&str) + Send,
		N: FnOnce(&SsrError) + Send,
	{
		let data_to_render = match render_data {
			RenderData::NoData { error } => {
				tracing::debug!(module = %options.module_name, "rendering not-found page");
				on_not_found(&error);
				return PageSourceResult::NotFound { error };
			}
			RenderData::Data { data_to_render } => data_to_render,
		};

		let data = match data_to_render.await {
			Ok(data) => data,
			Err(error) => {
				tracing::warn!(module = %options.module_name, error = %error, "page data failed");
				return PageSourceResult::Error { error };
			}
		};

		options.page_config = data.clone();
		match self.renderer.render(&options, data.as_ref()) {
			Ok(html) => {
				on_success(&html);
				PageSourceResult::Ok { html, data }
			}
			Err(source) => {
				let error = SsrError::Render {
					module: options.module_name,
					source,
				};
				tracing::warn!(error = %error, "page render failed");
				PageSourceResult::Error { error }
			}
		}
	}
}
