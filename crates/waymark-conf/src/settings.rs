//! Router settings.
//!
//! Settings come from TOML, either inline or from a file, and can then be
//! overridden from the environment:
//!
//! ```toml
//! app_root = "/shop/"
//! index_module = "home"
//!
//! [[rewrite]]
//! pattern = "/p/regex:(\\d+)"
//! target = "/pages/product/$1"
//! ```
//!
//! | Variable               | Field          |
//! |------------------------|----------------|
//! | `WAYMARK_APP_ROOT`     | `app_root`     |
//! | `WAYMARK_INDEX_MODULE` | `index_module` |

use crate::env::Env;
use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use waymark_urls::UrlRewriter;

/// One `[[rewrite]]` table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRuleSettings {
	pub pattern: String,
	pub target: String,
}

impl RewriteRuleSettings {
	pub fn new(pattern: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			target: target.into(),
		}
	}
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Prefix of every service URL. `None` means `/`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub app_root: Option<String>,
	/// Module served for the application root.
	pub index_module: String,
	/// Rewrite rules, in priority order.
	pub rewrite: Vec<RewriteRuleSettings>,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			app_root: None,
			index_module: "index".to_string(),
			rewrite: Vec::new(),
		}
	}
}

impl RouterSettings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
		Ok(toml::from_str(source)?)
	}

	pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		let source = fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loaded router settings");
		Self::from_toml_str(&source)
	}

	/// Applies overrides from the process environment.
	pub fn apply_env(self) -> Self {
		self.apply_env_from(&Env::new())
	}

	/// Applies overrides from `env`.
	pub fn apply_env_from(mut self, env: &Env) -> Self {
		if let Some(app_root) = env.str("APP_ROOT") {
			tracing::debug!(app_root = %app_root, "app root overridden from environment");
			self.app_root = Some(app_root);
		}
		if let Some(index_module) = env.str("INDEX_MODULE") {
			tracing::debug!(index_module = %index_module, "index module overridden from environment");
			self.index_module = index_module;
		}
		self
	}

	pub fn with_app_root(mut self, app_root: impl Into<String>) -> Self {
		self.app_root = Some(app_root.into());
		self
	}

	pub fn with_rewrite(mut self, pattern: impl Into<String>, target: impl Into<String>) -> Self {
		self.rewrite.push(RewriteRuleSettings::new(pattern, target));
		self
	}

	/// Checks the values that are not validated by rule compilation.
	pub fn validate(&self) -> SettingsResult<()> {
		let index = self.index_module.trim_matches('/');
		if index.is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "index_module".to_string(),
				message: "must name a module".to_string(),
			});
		}
		if index.contains(['?', '#']) {
			return Err(SettingsError::InvalidValue {
				key: "index_module".to_string(),
				message: "must not contain '?' or '#'".to_string(),
			});
		}
		if let Some(root) = &self.app_root
			&& !root.starts_with('/')
		{
			return Err(SettingsError::InvalidValue {
				key: "app_root".to_string(),
				message: format!("must start with '/', got '{}'", root),
			});
		}
		Ok(())
	}

	/// Compiles the rewrite table.
	pub fn build_rewriter(&self) -> SettingsResult<Arc<UrlRewriter>> {
		let mut rewriter = UrlRewriter::new();
		for rule in &self.rewrite {
			rewriter.add_rule(&rule.pattern, &rule.target)?;
		}
		Ok(Arc::new(rewriter))
	}

	/// Builds a client router URL helper.
	#[cfg(feature = "history")]
	pub fn build_router_url(&self) -> SettingsResult<waymark_history::RouterUrl> {
		self.validate()?;
		let url = waymark_history::RouterUrl::new(self.build_rewriter()?);
		Ok(match &self.app_root {
			Some(root) => url.with_app_root(root.as_str()),
			None => url,
		})
	}

	/// Builds a server page pipeline.
	#[cfg(feature = "ssr")]
	pub fn build_pipeline(
		&self,
		source: Arc<dyn waymark_ssr::ModuleSource>,
		renderer: Arc<dyn waymark_ssr::Renderer>,
	) -> SettingsResult<waymark_ssr::PagePipeline> {
		self.validate()?;
		Ok(waymark_ssr::PagePipeline::new(source, renderer, self.build_rewriter()?)
			.with_index_module(self.index_module.trim_matches('/')))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;
	use waymark_urls::RewriteDirection;

	const SAMPLE: &str = r#"
app_root = "/shop/"
index_module = "home"

[[rewrite]]
pattern = "/p/regex:(\\d+)"
target = "/pages/product/$1"

[[rewrite]]
pattern = "/about"
target = "/pages/about"
"#;

	#[rstest]
	fn test_from_toml_str() {
		let settings = RouterSettings::from_toml_str(SAMPLE).unwrap();

		assert_eq!(settings.app_root.as_deref(), Some("/shop/"));
		assert_eq!(settings.index_module, "home");
		assert_eq!(
			settings.rewrite,
			vec![
				RewriteRuleSettings::new("/p/regex:(\\d+)", "/pages/product/$1"),
				RewriteRuleSettings::new("/about", "/pages/about"),
			]
		);
	}

	#[rstest]
	fn test_missing_fields_use_defaults() {
		let settings = RouterSettings::from_toml_str("").unwrap();
		assert_eq!(settings, RouterSettings::default());
		assert_eq!(settings.index_module, "index");
	}

	#[rstest]
	fn test_parse_error() {
		let err = RouterSettings::from_toml_str("rewrite = 3").unwrap_err();
		assert!(matches!(err, SettingsError::Parse(_)));
	}

	#[rstest]
	fn test_build_rewriter() {
		let rewriter = RouterSettings::from_toml_str(SAMPLE)
			.unwrap()
			.build_rewriter()
			.unwrap();

		assert_eq!(rewriter.len(), 2);
		assert_eq!(
			rewriter.get("/p/7?ref=ad", RewriteDirection::ToInternal),
			"/pages/product/7?ref=ad"
		);
	}

	#[rstest]
	fn test_invalid_rule_fails_fast() {
		let err = RouterSettings::new()
			.with_rewrite("/x/regex:(", "/y")
			.build_rewriter()
			.unwrap_err();
		assert!(matches!(err, SettingsError::Rewrite(_)));
	}

	#[rstest]
	fn test_env_overrides() {
		let env = Env::from_map(HashMap::from([
			("WAYMARK_APP_ROOT".to_string(), "/service/".to_string()),
			("WAYMARK_INDEX_MODULE".to_string(), "landing".to_string()),
		]));

		let settings = RouterSettings::from_toml_str(SAMPLE).unwrap().apply_env_from(&env);

		assert_eq!(settings.app_root.as_deref(), Some("/service/"));
		assert_eq!(settings.index_module, "landing");
	}

	#[rstest]
	#[case(RouterSettings::new().with_app_root("shop"), "app_root")]
	#[case(RouterSettings { index_module: "/".to_string(), ..RouterSettings::default() }, "index_module")]
	#[case(RouterSettings { index_module: "home?x".to_string(), ..RouterSettings::default() }, "index_module")]
	fn test_validate_rejects(#[case] settings: RouterSettings, #[case] field: &str) {
		match settings.validate() {
			Err(SettingsError::InvalidValue { key, .. }) => assert_eq!(key, field),
			other => panic!("expected invalid value, got {:?}", other),
		}
	}

	#[rstest]
	fn test_serialize_round_trip_through_toml() {
		let settings = RouterSettings::new().with_rewrite("/a", "/pages/a");
		let text = toml::to_string(&settings).unwrap();
		assert_eq!(RouterSettings::from_toml_str(&text).unwrap(), settings);
	}
}
