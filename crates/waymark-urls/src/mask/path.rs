//! Path-zone parameter extraction.

use super::{Parameter, is_placeholder};
use crate::codec::decode_param;

/// Extracts placeholder values from `/`-delimited segments.
///
/// A mask starting with `/` is absolute and aligns with the first URL
/// segment. A relative mask whose first token is a literal is anchored at the
/// first URL segment equal to that literal, so `param/:valueId` resolves
/// against `/path/param/value`. A relative mask that starts with a
/// placeholder aligns with the first URL segment.
///
/// Matching is tolerant. Once a literal fails to match its URL segment the
/// mask has diverged and every later placeholder resolves to `None`; nothing
/// is reported as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParams;

impl PathParams {
	/// Walks `mask` and `url` segment by segment and emits one [`Parameter`]
	/// per placeholder, in mask order.
	pub fn calculate_params(mask: &str, url: &str) -> Vec<Parameter> {
		let mask_tokens = tokens(mask);
		let url_tokens = tokens(url);

		let anchor = if mask.starts_with('/') {
			Some(0)
		} else {
			match mask_tokens.first() {
				Some(first) if !is_placeholder(first) => {
					url_tokens.iter().position(|token| token == first)
				}
				_ => Some(0),
			}
		};

		let mut diverged = anchor.is_none();
		let base = anchor.unwrap_or(0);
		let mut params = Vec::new();

		for (i, token) in mask_tokens.iter().enumerate() {
			let url_token = if diverged {
				None
			} else {
				url_tokens.get(base + i).copied()
			};

			if let Some(name) = token.strip_prefix(':') {
				let url_id = i
					.checked_sub(1)
					.map(|prev| mask_tokens[prev])
					.filter(|prev| !is_placeholder(prev))
					.map(str::to_string);

				params.push(Parameter {
					mask_id: name.to_string(),
					url_id,
					url_value: url_token.filter(|t| !t.is_empty()).map(decode_param),
				});
			} else if url_token != Some(*token) {
				diverged = true;
			}
		}

		params
	}
}

/// Splits a path on `/` after dropping one leading separator.
fn tokens(path: &str) -> Vec<&str> {
	let path = path.strip_prefix('/').unwrap_or(path);
	if path.is_empty() {
		Vec::new()
	} else {
		path.split('/').collect()
	}
}
