//! Server-side page pipeline for Waymark.
//!
//! A request URL is rewritten to an internal module name, the module is
//! loaded through a [`ModuleSource`], its data loader (if any) is awaited and
//! the result is rendered by a [`Renderer`]. The outcome is classified as a
//! [`PageSourceResult`]: `Ok`, `NotFound` or `Error`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use waymark_ssr::{
//!     HookOutput, InMemoryModuleSource, ModuleDef, PagePipeline, PageRequest, RenderOptions,
//!     render_fn,
//! };
//! use waymark_urls::UrlRewriter;
//!
//! let source = InMemoryModuleSource::new().with_module(
//!     "index",
//!     ModuleDef::new().with_data_loader(|_, _, _| Ok(HookOutput::Ready(Some(json!("hello"))))),
//! );
//! let pipeline = PagePipeline::new(
//!     Arc::new(source),
//!     render_fn(|_, data| Ok(format!("<p>{}</p>", data.map(|d| d.to_string()).unwrap_or_default()))),
//!     Arc::new(UrlRewriter::new()),
//! );
//!
//! let result = futures::executor::block_on(pipeline.get_page_source(
//!     RenderOptions::new(),
//!     &PageRequest::new("/"),
//!     |_| {},
//!     |_| {},
//! ));
//! assert_eq!(result.html(), Some("<p>\"hello\"</p>"));
//! ```

pub mod data;
pub mod error;
pub mod loader;
pub mod module;
pub mod page_source;
pub mod pipeline;
pub mod result;

pub use data::{DataFuture, DataToRender};
pub use error::{BoxError, SsrError, SsrResult};
pub use loader::{InMemoryModuleSource, LoadResult, LoadStatus, ModuleLoader, ModuleSource};
pub use module::{DataLoader, DataOptions, ExportDef, HookOutput, ModuleDef, PageExport, PageModule, ServerRouter};
pub use page_source::{PageSource, RenderData, RenderOptions, Renderer, render_fn};
pub use pipeline::{DEFAULT_INDEX_MODULE, PagePipeline, PageRequest};
pub use result::{PageSourceResult, PageStatus};
