//! URL primitives for the Waymark router.
//!
//! This crate holds the pure, synchronous parts of routing:
//!
//! - [`UrlParts`]: path / query / fragment decomposition of a raw URL
//! - [`encode_param`] / [`decode_param`]: segment-safe parameter encoding
//! - [`Mask`] and [`UrlParamsGetter`]: placeholder extraction across zones
//! - [`UrlRewriter`]: external route to internal module path rewriting
//!
//! ## Example
//!
//! ```
//! use waymark_urls::{Mask, RewriteDirection, UrlRewriter};
//!
//! let mask = Mask::parse("/users/:id#tab/:tab").unwrap();
//! let params = mask.resolve("/users/42#tab/activity");
//! assert_eq!(params.get("id"), Some("42"));
//! assert_eq!(params.get("tab"), Some("activity"));
//!
//! let rewriter = UrlRewriter::new().with_rule("/u/regex:(\\d+)", "/pages/user/$1").unwrap();
//! assert_eq!(rewriter.get("/u/42", RewriteDirection::ToInternal), "/pages/user/42");
//! ```

pub mod codec;
pub mod error;
pub mod mask;
pub mod parts;
pub mod rewrite;

pub use codec::{decode_param, encode_param};
pub use error::{MaskError, RewriteError};
pub use mask::{
	MAX_MASK_LENGTH, Mask, Parameter, ParamsMap, PathParams, QueryParams, QueryZone,
	UrlParamsGetter, resolve,
};
pub use parts::UrlParts;
pub use rewrite::{RewriteDirection, RewriteRule, UrlRewriter, rewrite};
