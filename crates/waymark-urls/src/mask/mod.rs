//! Route masks and parameter extraction.
//!
//! A mask is a route pattern made of literal segments and `:name`
//! placeholders. Placeholders may live in three zones at once:
//!
//! - path: `/users/:id`
//! - query: `?tab=:tab`
//! - fragment: `#section/:section` or `#modal=:modal`
//!
//! Resolution never fails. Placeholders whose URL counterpart is missing
//! resolve to `None` and are left out of the resulting [`ParamsMap`].

mod getter;
mod path;
mod query;

pub use getter::UrlParamsGetter;
pub use path::PathParams;
pub use query::{QueryParams, QueryZone};

use crate::codec::encode_param;
use crate::error::MaskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum accepted mask length in bytes.
pub const MAX_MASK_LENGTH: usize = 1024;

/// One placeholder binding produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
	/// Placeholder name without the leading `:`.
	pub mask_id: String,
	/// Literal the placeholder is bound under: the preceding path segment or
	/// the query key.
	pub url_id: Option<String>,
	/// Decoded value, or `None` when the URL has no counterpart.
	pub url_value: Option<String>,
}

/// Resolved placeholder values keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamsMap(BTreeMap<String, String>);

impl ParamsMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a map from parameter records, skipping absent values. Later
	/// records override earlier ones with the same name.
	pub fn from_parameters<I>(parameters: I) -> Self
	where
		I: IntoIterator<Item = Parameter>,
	{
		parameters
			.into_iter()
			.filter_map(|p| p.url_value.map(|value| (p.mask_id, value)))
			.collect()
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	pub fn contains_key(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns the names whose value differs between `self` and `other`,
	/// including names present on only one side, in sorted order.
	pub fn changed_keys(&self, other: &ParamsMap) -> Vec<String> {
		let mut changed: Vec<String> = self
			.0
			.iter()
			.filter(|(k, v)| other.0.get(*k) != Some(*v))
			.map(|(k, _)| k.clone())
			.collect();
		changed.extend(
			other
				.0
				.keys()
				.filter(|k| !self.0.contains_key(*k))
				.cloned(),
		);
		changed.sort();
		changed
	}
}

impl FromIterator<(String, String)> for ParamsMap {
	fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a ParamsMap {
	type Item = (&'a String, &'a String);
	type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// A validated route mask.
///
/// # Examples
///
/// ```
/// use waymark_urls::Mask;
///
/// let mask = Mask::parse("/users/:id?tab=:tab").unwrap();
/// assert_eq!(mask.placeholders(), &["id", "tab"]);
///
/// let params = mask.resolve("/users/42?tab=posts");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(mask.reverse(&params).as_deref(), Some("/users/42?tab=posts"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
	source: String,
	placeholders: Vec<String>,
}

impl Mask {
	/// Parses and validates a mask.
	///
	/// # Errors
	///
	/// - [`MaskError::TooLong`] if the mask exceeds [`MAX_MASK_LENGTH`]
	/// - [`MaskError::EmptyPlaceholder`] for a bare `:`
	/// - [`MaskError::DuplicatePlaceholder`] if a name repeats in any zone
	pub fn parse(mask: &str) -> Result<Self, MaskError> {
		if mask.len() > MAX_MASK_LENGTH {
			return Err(MaskError::TooLong {
				length: mask.len(),
				max: MAX_MASK_LENGTH,
			});
		}

		let (main, fragment) = mask.split_once('#').unwrap_or((mask, ""));
		let mut placeholders: Vec<String> = Vec::new();

		for zones in [Zones::split(main), Zones::split(fragment)] {
			let path_names = zones.path.split('/').filter_map(|t| t.strip_prefix(':'));
			let query_names = zones
				.query
				.split('&')
				.filter_map(|pair| pair.split_once('='))
				.filter_map(|(_, value)| value.strip_prefix(':'));

			for name in path_names.chain(query_names) {
				if name.is_empty() {
					return Err(MaskError::EmptyPlaceholder {
						mask: mask.to_string(),
					});
				}
				if placeholders.iter().any(|existing| existing == name) {
					return Err(MaskError::DuplicatePlaceholder {
						name: name.to_string(),
						mask: mask.to_string(),
					});
				}
				placeholders.push(name.to_string());
			}
		}

		Ok(Self {
			source: mask.to_string(),
			placeholders,
		})
	}

	/// Returns the mask string.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Returns placeholder names in declaration order.
	pub fn placeholders(&self) -> &[String] {
		&self.placeholders
	}

	/// Returns every parameter record for `url`, including absent ones.
	pub fn parameters(&self, url: &str) -> Vec<Parameter> {
		UrlParamsGetter::new(&self.source, url).parameters()
	}

	/// Resolves `url` into a [`ParamsMap`].
	pub fn resolve(&self, url: &str) -> ParamsMap {
		UrlParamsGetter::new(&self.source, url).get()
	}

	/// Fills the mask back into a URL with encoded values.
	///
	/// Path placeholders are required and a missing one yields `None`. Query
	/// placeholders are optional and their pair is dropped when missing.
	pub fn reverse(&self, params: &ParamsMap) -> Option<String> {
		let (main, fragment) = self
			.source
			.split_once('#')
			.unwrap_or((self.source.as_str(), ""));

		let mut url = reverse_zones(Zones::split(main), params)?;
		if !fragment.is_empty() {
			let fragment = reverse_zones(Zones::split(fragment), params)?;
			if !fragment.is_empty() {
				url.push('#');
				url.push_str(&fragment);
			}
		}
		Some(url)
	}
}

impl fmt::Display for Mask {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

/// Parses `mask` and resolves `url` against it.
///
/// # Errors
///
/// Returns [`MaskError`] if the mask is malformed. A URL that does not fit
/// the mask is not an error.
pub fn resolve(mask: &str, url: &str) -> Result<ParamsMap, MaskError> {
	Ok(Mask::parse(mask)?.resolve(url))
}

pub(crate) fn is_placeholder(token: &str) -> bool {
	token.starts_with(':')
}

/// Path-style and query-style halves of a mask zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Zones<'a> {
	pub path: &'a str,
	pub query: &'a str,
}

impl<'a> Zones<'a> {
	/// Splits on the first `?`. Without one, a string containing `=` but no
	/// `/` is taken as a bare query; anything else is a path.
	pub fn split(s: &'a str) -> Self {
		if let Some((path, query)) = s.split_once('?') {
			Self { path, query }
		} else if s.contains('=') && !s.contains('/') {
			Self { path: "", query: s }
		} else {
			Self { path: s, query: "" }
		}
	}
}

fn reverse_zones(zones: Zones<'_>, params: &ParamsMap) -> Option<String> {
	let mut path = String::new();
	if !zones.path.is_empty() {
		let segments = zones
			.path
			.split('/')
			.map(|token| match token.strip_prefix(':') {
				Some(name) => params.get(name).map(encode_param),
				None => Some(token.to_string()),
			})
			.collect::<Option<Vec<_>>>()?;
		path = segments.join("/");
	}

	let query: Vec<String> = zones
		.query
		.split('&')
		.filter(|pair| !pair.is_empty())
		.filter_map(|pair| match pair.split_once('=') {
			Some((key, value)) => match value.strip_prefix(':') {
				Some(name) => params
					.get(name)
					.map(|v| format!("{}={}", key, encode_param(v))),
				None => Some(pair.to_string()),
			},
			None => Some(pair.to_string()),
		})
		.collect();

	if !query.is_empty() {
		path.push('?');
		path.push_str(&query.join("&"));
	}
	Some(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a/:b?c=:d", "a/:b", "c=:d")]
	#[case("k=:v", "", "k=:v")]
	#[case("k=:v&x=:y", "", "k=:v&x=:y")]
	#[case("a/b=c", "a/b=c", "")]
	#[case("?k=:v", "", "k=:v")]
	#[case("", "", "")]
	fn test_zones_split(#[case] input: &str, #[case] path: &str, #[case] query: &str) {
		assert_eq!(Zones::split(input), Zones { path, query });
	}

	#[rstest]
	fn test_parse_collects_placeholders_across_zones() {
		let mask = Mask::parse("/a/:x?q=:y#tab/:z?m=:w").unwrap();
		assert_eq!(mask.placeholders(), &["x", "y", "z", "w"]);
	}

	#[rstest]
	#[case("/users/:id/posts/:id")]
	#[case("/users/:id?id=:id")]
	#[case("/users/:id#tab/:id")]
	fn test_parse_rejects_duplicates(#[case] input: &str) {
		let err = Mask::parse(input).unwrap_err();
		assert!(matches!(err, MaskError::DuplicatePlaceholder { ref name, .. } if name == "id"));
	}

	#[rstest]
	fn test_parse_rejects_empty_placeholder() {
		assert!(matches!(
			Mask::parse("/users/:"),
			Err(MaskError::EmptyPlaceholder { .. })
		));
	}

	#[rstest]
	fn test_parse_rejects_long_mask() {
		let long = "a/".repeat(MAX_MASK_LENGTH);
		assert!(matches!(Mask::parse(&long), Err(MaskError::TooLong { .. })));
	}

	#[rstest]
	fn test_mask_without_placeholders_is_valid() {
		let mask = Mask::parse("/about").unwrap();
		assert!(mask.placeholders().is_empty());
		assert!(mask.resolve("/about").is_empty());
	}

	#[rstest]
	fn test_reverse_encodes_values() {
		let mask = Mask::parse("/files/:name").unwrap();
		let mut params = ParamsMap::new();
		params.insert("name", "a/b c");
		assert_eq!(mask.reverse(&params).as_deref(), Some("/files/a%2Fb%20c"));
	}

	#[rstest]
	fn test_reverse_requires_path_placeholders() {
		let mask = Mask::parse("/users/:id").unwrap();
		assert_eq!(mask.reverse(&ParamsMap::new()), None);
	}

	#[rstest]
	fn test_reverse_drops_missing_query_pairs() {
		let mask = Mask::parse("/list?page=:page&sort=:sort#tab/:tab").unwrap();
		let mut params = ParamsMap::new();
		params.insert("sort", "name");
		params.insert("tab", "grid");
		assert_eq!(
			mask.reverse(&params).as_deref(),
			Some("/list?sort=name#tab/grid")
		);
	}

	#[rstest]
	fn test_changed_keys() {
		let before: ParamsMap = [("a", "1"), ("b", "2"), ("c", "3")]
			.into_iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		let after: ParamsMap = [("a", "1"), ("b", "9"), ("d", "4")]
			.into_iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		assert_eq!(before.changed_keys(&after), vec!["b", "c", "d"]);
		assert!(before.changed_keys(&before).is_empty());
	}

	#[rstest]
	fn test_params_map_serializes_as_object() {
		let mut params = ParamsMap::new();
		params.insert("id", "7");
		assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"id":"7"}"#);
	}

	#[rstest]
	fn test_resolve_free_function() {
		let params = resolve("param/:valueId", "/path/param/value").unwrap();
		assert_eq!(params.get("valueId"), Some("value"));
		assert!(resolve("/:a/:a", "/x/y").is_err());
	}
}
