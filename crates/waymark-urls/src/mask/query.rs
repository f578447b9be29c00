//! Query-zone parameter extraction.

use super::Parameter;
use crate::codec::decode_param;

/// Which part of a URL a [`QueryParams`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryZone {
	/// The top-level query, after `?`.
	Query,
	/// The query-style tail of a fragment, after `#` and an optional `?`.
	Fragment,
}

/// Extracts placeholder values from `key=:name` pairs.
#[derive(Debug, Clone, Copy)]
pub struct QueryParams {
	zone: QueryZone,
}

impl QueryParams {
	/// Creates an extractor for the top-level query.
	pub fn for_query() -> Self {
		Self {
			zone: QueryZone::Query,
		}
	}

	/// Creates an extractor for the query-style portion of a fragment.
	pub fn for_fragment() -> Self {
		Self {
			zone: QueryZone::Fragment,
		}
	}

	/// Returns the zone this extractor reads from.
	pub fn zone(&self) -> QueryZone {
		self.zone
	}

	/// Emits one [`Parameter`] per `key=:name` pair in `mask`.
	///
	/// `url` is a raw `&`-joined list of `key=value` pairs; the zone's leading
	/// delimiter is accepted and skipped. Keys and values are decoded and the
	/// first occurrence of a key wins. A pair whose key is absent from `url`
	/// yields `url_value: None`. Mask pairs with a literal value are ignored.
	pub fn calculate_params(&self, mask: &str, url: &str) -> Vec<Parameter> {
		let url = self.trim_delimiter(url);
		let pairs: Vec<(String, String)> = url
			.split('&')
			.filter(|pair| !pair.is_empty())
			.map(|pair| {
				let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
				(decode_param(key), decode_param(value))
			})
			.collect();

		self.trim_delimiter(mask)
			.split('&')
			.filter_map(|pair| pair.split_once('='))
			.filter_map(|(key, value)| {
				let name = value.strip_prefix(':')?;
				let url_value = pairs
					.iter()
					.find(|(url_key, _)| url_key == key)
					.map(|(_, url_value)| url_value.clone());

				Some(Parameter {
					mask_id: name.to_string(),
					url_id: Some(key.to_string()),
					url_value,
				})
			})
			.collect()
	}

	fn trim_delimiter<'a>(&self, s: &'a str) -> &'a str {
		let s = match self.zone {
			QueryZone::Query => s,
			QueryZone::Fragment => s.strip_prefix('#').unwrap_or(s),
		};
		s.strip_prefix('?').unwrap_or(s)
	}
}
