//! Top-level mask resolution across path, query and fragment.

use super::path::PathParams;
use super::query::QueryParams;
use super::{ParamsMap, Parameter, Zones};
use crate::parts::UrlParts;

/// Resolves every zone of a mask against a URL.
///
/// The mask is split on its first `#`. The part before is resolved against
/// the URL's path and query, the part after against the URL's fragment. The
/// fragment mask is split into a path-style and a query-style zone, and the
/// URL fragment is split to match that shape.
///
/// # Examples
///
/// ```
/// use waymark_urls::UrlParamsGetter;
///
/// let getter = UrlParamsGetter::new("/users/:id#tab/:tab", "/users/7#tab/posts");
/// let params = getter.get();
/// assert_eq!(params.get("id"), Some("7"));
/// assert_eq!(params.get("tab"), Some("posts"));
/// ```
#[derive(Debug, Clone)]
pub struct UrlParamsGetter {
	path: Vec<Parameter>,
	query: Vec<Parameter>,
	fragment_path: Vec<Parameter>,
	fragment_query: Vec<Parameter>,
}

impl UrlParamsGetter {
	/// Resolves `mask` against `url`.
	pub fn new(mask: &str, url: &str) -> Self {
		let parts = UrlParts::new(url);
		let (main_mask, fragment_mask) = mask.split_once('#').unwrap_or((mask, ""));

		let main = Zones::split(main_mask);
		let path = PathParams::calculate_params(main.path, parts.path());
		let query = QueryParams::for_query().calculate_params(main.query, parts.query());

		let (fragment_path, fragment_query) = if fragment_mask.is_empty() {
			(Vec::new(), Vec::new())
		} else {
			let zones = Zones::split(fragment_mask);
			let url_zones = fragment_zones(fragment_mask, zones, parts.fragment());
			(
				PathParams::calculate_params(zones.path, url_zones.path),
				QueryParams::for_fragment().calculate_params(zones.query, url_zones.query),
			)
		};

		tracing::trace!(
			mask,
			url,
			path = path.len(),
			query = query.len(),
			fragment = fragment_path.len() + fragment_query.len(),
			"resolved mask parameters"
		);

		Self {
			path,
			query,
			fragment_path,
			fragment_query,
		}
	}

	/// Returns every parameter record in precedence order: path, query,
	/// fragment path, fragment query.
	pub fn parameters(&self) -> Vec<Parameter> {
		self.path
			.iter()
			.chain(&self.query)
			.chain(&self.fragment_path)
			.chain(&self.fragment_query)
			.cloned()
			.collect()
	}

	/// Flattens the parameters into a map; later zones override earlier ones.
	pub fn get(&self) -> ParamsMap {
		ParamsMap::from_parameters(self.parameters())
	}
}

/// Splits a URL fragment the way its mask is shaped.
///
/// The URL text is never classified on its own, so a value holding `/` or `=`
/// stays in the zone the mask puts it in.
fn fragment_zones<'a>(mask: &str, zones: Zones<'_>, fragment: &'a str) -> Zones<'a> {
	if zones.path.is_empty() {
		Zones {
			path: "",
			query: fragment,
		}
	} else if mask.contains('?') {
		let (path, query) = fragment.split_once('?').unwrap_or((fragment, ""));
		Zones { path, query }
	} else {
		Zones {
			path: fragment,
			query: "",
		}
	}
}
