//! Environment overrides.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default prefix of Waymark environment variables.
pub const ENV_PREFIX: &str = "WAYMARK_";

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Prefixed environment variable reader.
///
/// Reads the process environment by default. [`Env::from_map`] supplies a
/// fixed set of variables instead.
#[derive(Clone)]
pub struct Env {
	prefix: String,
	lookup: Lookup,
}

impl fmt::Debug for Env {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Env")
			.field("prefix", &self.prefix)
			.finish_non_exhaustive()
	}
}

impl Default for Env {
	fn default() -> Self {
		Self::new()
	}
}

impl Env {
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			lookup: Arc::new(|key: &str| std::env::var(key).ok()),
		}
	}

	/// Reads variables from `vars` instead of the process environment.
	pub fn from_map(vars: HashMap<String, String>) -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			lookup: Arc::new(move |key: &str| vars.get(key).cloned()),
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	fn key_name(&self, key: &str) -> String {
		format!("{}{}", self.prefix, key)
	}

	/// Reads `key` under the prefix. Blank values count as unset.
	pub fn str(&self, key: &str) -> Option<String> {
		(self.lookup)(&self.key_name(key)).filter(|value| !value.trim().is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn env(pairs: &[(&str, &str)]) -> Env {
		Env::from_map(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		)
	}

	#[rstest]
	fn test_str_applies_prefix() {
		let env = env(&[("WAYMARK_APP_ROOT", "/app/"), ("APP_ROOT", "/other/")]);
		assert_eq!(env.str("APP_ROOT").as_deref(), Some("/app/"));
	}

	#[rstest]
	fn test_custom_prefix() {
		let env = env(&[("SHOP_APP_ROOT", "/shop/")]).with_prefix("SHOP_");
		assert_eq!(env.prefix(), "SHOP_");
		assert_eq!(env.str("APP_ROOT").as_deref(), Some("/shop/"));
	}

	#[rstest]
	fn test_blank_value_is_unset() {
		let env = env(&[("WAYMARK_INDEX_MODULE", "  ")]);
		assert_eq!(env.str("INDEX_MODULE"), None);
		assert_eq!(env.str("MISSING"), None);
	}
}
