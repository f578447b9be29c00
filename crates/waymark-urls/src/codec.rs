//! Percent-encoding of individual parameter values.
//!
//! Values are encoded so they can be placed inside a single path segment:
//! the path separator `/` is escaped along with spaces and every other byte
//! outside the unreserved set.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Bytes left untouched by [`encode_param`]: ASCII alphanumerics and `-_.!~*'()`.
const PARAM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Percent-encodes a parameter value.
///
/// # Examples
///
/// ```
/// use waymark_urls::encode_param;
///
/// assert_eq!(encode_param("a/b c"), "a%2Fb%20c");
/// assert_eq!(encode_param("100%"), "100%25");
/// ```
pub fn encode_param(value: &str) -> String {
	utf8_percent_encode(value, PARAM_ENCODE_SET).to_string()
}

/// Decodes a value produced by [`encode_param`].
///
/// Malformed UTF-8 after decoding is replaced with U+FFFD rather than
/// rejected, so arbitrary URL input never fails to decode.
pub fn decode_param(value: &str) -> String {
	percent_decode_str(value).decode_utf8_lossy().into_owned()
}
