//! Settings for Waymark.
//!
//! [`RouterSettings`] holds the application root, the index module and the
//! rewrite table. It loads from TOML, takes `WAYMARK_*` environment
//! overrides and builds the shared [`UrlRewriter`](waymark_urls::UrlRewriter).
//! With the `history` or `ssr` features it also builds a `RouterUrl` or a
//! `PagePipeline` directly.

pub mod env;
pub mod error;
pub mod settings;

pub use env::{ENV_PREFIX, Env};
pub use error::{SettingsError, SettingsResult};
pub use settings::{RewriteRuleSettings, RouterSettings};
