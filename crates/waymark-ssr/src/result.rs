//! Per-request page outcome.

use crate::error::SsrError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal status of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
	Ok,
	NotFound,
	Error,
}

/// Classified result of one pass through the pipeline.
///
/// Created per request and never shared between requests.
#[derive(Debug)]
pub enum PageSourceResult {
	/// The page rendered.
	Ok {
		html: String,
		/// Data returned by the module's data loader, if any.
		data: Option<Value>,
	},
	/// The module does not exist.
	NotFound { error: SsrError },
	/// Loading, data loading or rendering failed.
	Error { error: SsrError },
}

impl PageSourceResult {
	pub fn status(&self) -> PageStatus {
		match self {
			Self::Ok { .. } => PageStatus::Ok,
			Self::NotFound { .. } => PageStatus::NotFound,
			Self::Error { .. } => PageStatus::Error,
		}
	}

	pub fn is_ok(&self) -> bool {
		matches!(self, Self::Ok { .. })
	}

	pub fn html(&self) -> Option<&str> {
		match self {
			Self::Ok { html, .. } => Some(html.as_str()),
			_ => None,
		}
	}

	pub fn data(&self) -> Option<&Value> {
		match self {
			Self::Ok { data, .. } => data.as_ref(),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&SsrError> {
		match self {
			Self::NotFound { error } | Self::Error { error } => Some(error),
			Self::Ok { .. } => None,
		}
	}

	/// Consumes the result and returns its error, if any.
	pub fn into_error(self) -> Option<SsrError> {
		match self {
			Self::NotFound { error } | Self::Error { error } => Some(error),
			Self::Ok { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_status_serializes_screaming_snake_case() {
		assert_eq!(
			serde_json::to_value(PageStatus::NotFound).unwrap(),
			json!("NOT_FOUND")
		);
		assert_eq!(serde_json::to_value(PageStatus::Ok).unwrap(), json!("OK"));
	}

	#[rstest]
	fn test_accessors() {
		let ok = PageSourceResult::Ok {
			html: "<p>hi</p>".to_string(),
			data: Some(json!({"n": 1})),
		};
		assert!(ok.is_ok());
		assert_eq!(ok.html(), Some("<p>hi</p>"));
		assert_eq!(ok.data(), Some(&json!({"n": 1})));
		assert!(ok.error().is_none());

		let missing = PageSourceResult::NotFound {
			error: SsrError::NotFound {
				module: "x".to_string(),
			},
		};
		assert_eq!(missing.status(), PageStatus::NotFound);
		assert!(missing.html().is_none());
		assert!(missing.into_error().unwrap().is_not_found());
	}
}
