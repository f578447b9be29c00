//! # Waymark
//!
//! URL routing engine for single-page applications rendered on the server
//! and navigated on the client.
//!
//! ## Feature Flags
//!
//! - `history` - client navigation: history stack, router URL, guards, watchers
//! - `ssr` - server page pipeline: module loading, data hooks, page source
//! - `conf` - settings from TOML and `WAYMARK_*` environment variables
//! - `full` (default) - all of the above
//!
//! Masks, the parameter codec and the rewriter are always available.
//!
//! ## Quick Example
//!
//! ```
//! use waymark::prelude::*;
//!
//! let mask = Mask::parse("/users/:id?tab=:tab").unwrap();
//! let params = mask.resolve("/users/7?tab=posts");
//! assert_eq!(params.get("id"), Some("7"));
//! assert_eq!(params.get("tab"), Some("posts"));
//!
//! let rewriter = UrlRewriter::new()
//!     .with_rule("/u/regex:(\\d+)", "/pages/user/$1")
//!     .unwrap();
//! assert_eq!(rewrite(&rewriter, "/pages/user/7", RewriteDirection::ToExternal), "/u/7");
//! ```

#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "history")]
pub mod history;
#[cfg(feature = "ssr")]
pub mod ssr;
pub mod urls;

pub use waymark_urls::{
	Mask, MaskError, ParamsMap, RewriteDirection, RewriteError, UrlParts, UrlRewriter,
	decode_param, encode_param, resolve, rewrite,
};

#[cfg(feature = "history")]
pub use waymark_history::{NavigateOptions, Navigation, Router, RouterError, RouterUrl};

#[cfg(feature = "ssr")]
pub use waymark_ssr::{PagePipeline, PageRequest, PageSourceResult, PageStatus, SsrError};

#[cfg(feature = "conf")]
pub use waymark_conf::{RouterSettings, SettingsError};

/// Commonly used items.
pub mod prelude {
	pub use waymark_urls::{
		Mask, ParamsMap, RewriteDirection, UrlParts, UrlRewriter, decode_param, encode_param,
		resolve, rewrite,
	};

	#[cfg(feature = "history")]
	pub use waymark_history::{
		GuardHandle, Location, NavigateOptions, Navigation, Router, RouterUrl, WindowHistory,
		WindowLocation, service_url,
	};

	#[cfg(feature = "ssr")]
	pub use waymark_ssr::{
		HookOutput, InMemoryModuleSource, ModuleDef, ModuleSource, PageModule, PagePipeline,
		PageRequest, PageSourceResult, PageStatus, RenderOptions, Renderer, render_fn,
	};

	#[cfg(feature = "conf")]
	pub use waymark_conf::RouterSettings;
}
