//! Data loader discovery and normalization.

use crate::error::{SsrError, SsrResult};
use crate::module::{DataOptions, HookOutput, PageModule, ServerRouter};
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::fmt;

/// Future resolving to the page data of one request.
pub type DataFuture = BoxFuture<'static, SsrResult<Option<Value>>>;

/// Result of probing a module for its data loader.
pub enum DataToRender {
	/// The module has no data loader. This is not an error.
	Absent,
	/// The loader was called; its output is normalized into one future.
	Hook(DataFuture),
}

impl fmt::Debug for DataToRender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Absent => f.write_str("Absent"),
			Self::Hook(_) => f.write_str("Hook(..)"),
		}
	}
}

impl DataToRender {
	/// Looks for a data loader on the default export, then on the module
	/// itself, and calls it with `DataOptions { prerender: false }`.
	///
	/// Ready values, pending futures and synchronous failures all become a
	/// single [`DataFuture`]; failures resolve to [`SsrError::DataLoad`].
	pub fn get(module: &dyn PageModule, url: &str, module_name: &str, router: &ServerRouter) -> Self {
		let loader = module
			.default_export()
			.and_then(|export| export.data_loader())
			.or_else(|| module.data_loader());

		let Some(loader) = loader else {
			tracing::trace!(module = module_name, "page module has no data loader");
			return Self::Absent;
		};

		let name = module_name.to_string();
		let future: DataFuture = match loader.get_data_to_render(url, DataOptions::default(), router) {
			Ok(HookOutput::Ready(data)) => future::ready(Ok(data)).boxed(),
			Ok(HookOutput::Pending(pending)) => pending
				.map(move |result| {
					result.map_err(|source| SsrError::DataLoad {
						module: name,
						source,
					})
				})
				.boxed(),
			Err(source) => future::ready(Err(SsrError::DataLoad {
				module: name,
				source,
			}))
			.boxed(),
		};
		Self::Hook(future)
	}

	pub fn has_hook(&self) -> bool {
		matches!(self, Self::Hook(_))
	}

	/// Converts into a future; `Absent` resolves to `None`.
	pub fn into_future(self) -> DataFuture {
		match self {
			Self::Absent => future::ready(Ok(None)).boxed(),
			Self::Hook(future) => future,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BoxError;
	use crate::module::{ExportDef, ModuleDef};
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Arc;
	use waymark_urls::UrlRewriter;

	#[fixture]
	fn router() -> ServerRouter {
		ServerRouter::new("/blog/1", "blog", Arc::new(UrlRewriter::new()))
	}

	#[rstest]
	fn test_module_without_loader_is_absent(router: ServerRouter) {
		let module = ModuleDef::new().with_default_export(ExportDef::new());
		let data = DataToRender::get(&module, "/blog/1", "blog", &router);
		assert!(!data.has_hook());
	}

	#[rstest]
	#[tokio::test]
	async fn test_ready_value(router: ServerRouter) {
		let module = ModuleDef::new()
			.with_data_loader(|url, _, _| Ok(HookOutput::Ready(Some(json!({ "url": url })))));
		let data = DataToRender::get(&module, "/blog/1", "blog", &router);

		assert!(data.has_hook());
		assert_eq!(data.into_future().await.unwrap(), Some(json!({"url": "/blog/1"})));
	}

	#[rstest]
	#[tokio::test]
	async fn test_ready_none(router: ServerRouter) {
		let module = ModuleDef::new().with_data_loader(|_, _, _| Ok(HookOutput::Ready(None)));
		let data = DataToRender::get(&module, "/", "index", &router);
		assert_eq!(data.into_future().await.unwrap(), None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_pending_value(router: ServerRouter) {
		let module = ModuleDef::new().with_data_loader(|_, options, router| {
			let module = router.module_name().to_string();
			Ok(HookOutput::Pending(
				async move {
					Ok::<_, BoxError>(Some(json!({ "prerender": options.prerender, "module": module })))
				}
					.boxed(),
			))
		});
		let data = DataToRender::get(&module, "/blog/1", "blog", &router);

		assert_eq!(
			data.into_future().await.unwrap(),
			Some(json!({"prerender": false, "module": "blog"}))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_default_export_takes_precedence(router: ServerRouter) {
		let module = ModuleDef::new()
			.with_data_loader(|_, _, _| Ok(HookOutput::Ready(Some(json!("namespace")))))
			.with_default_export(
				ExportDef::new()
					.with_data_loader(|_, _, _| Ok(HookOutput::Ready(Some(json!("default"))))),
			);
		let data = DataToRender::get(&module, "/", "index", &router);
		assert_eq!(data.into_future().await.unwrap(), Some(json!("default")));
	}

	#[rstest]
	#[tokio::test]
	async fn test_sync_error_becomes_data_load(router: ServerRouter) {
		let module = ModuleDef::new().with_data_loader(|_, _, _| Err("boom".into()));
		let data = DataToRender::get(&module, "/", "index", &router);

		let err = data.into_future().await.unwrap_err();
		assert!(matches!(err, SsrError::DataLoad { ref module, .. } if module == "index"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_rejected_future_becomes_data_load(router: ServerRouter) {
		let module = ModuleDef::new().with_data_loader(|_, _, _| {
			Ok(HookOutput::Pending(async { Err::<Option<Value>, BoxError>("timeout".into()) }.boxed()))
		});
		let data = DataToRender::get(&module, "/", "index", &router);

		let err = data.into_future().await.unwrap_err();
		assert_eq!(err.to_string(), "data loader for page module 'index' failed: timeout");
	}

	#[rstest]
	#[tokio::test]
	async fn test_absent_future_resolves_to_none() {
		assert_eq!(DataToRender::Absent.into_future().await.unwrap(), None);
	}
}
