//! Pattern to target rewriting of externally visible routes.
//!
//! A rule maps an external `pattern` to an internal `target`. Pattern
//! segments are either literals or `regex:`-prefixed expressions matched
//! against a whole path segment. Capture groups are numbered across the
//! pattern from left to right and referenced in the target as `$1`, `$2`, ...
//!
//! ```
//! use waymark_urls::{RewriteDirection, UrlRewriter};
//!
//! let rewriter = UrlRewriter::new()
//!     .with_rule("/blog/regex:(\\d+)", "/pages/post/$1")
//!     .unwrap();
//!
//! assert_eq!(rewriter.get("/blog/42?ref=x", RewriteDirection::ToInternal), "/pages/post/42?ref=x");
//! assert_eq!(rewriter.get("/pages/post/42", RewriteDirection::ToExternal), "/blog/42");
//! ```
//!
//! Only the path component is rewritten; query and fragment pass through.

use crate::error::RewriteError;
use crate::parts::UrlParts;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Prefix marking a pattern segment as a regular expression.
pub const REGEX_SEGMENT_PREFIX: &str = "regex:";

/// Maximum accepted length for a rule pattern or target in bytes.
pub const MAX_RULE_PATTERN_LENGTH: usize = 1024;

/// Maximum compiled size of a rule regex.
const MAX_RULE_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Direction of a rewrite lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteDirection {
	/// External route to internal module path.
	ToInternal,
	/// Internal module path back to the external route.
	ToExternal,
}

#[derive(Debug, Clone)]
enum PatternSegment {
	Literal(String),
	Regex {
		regex: Regex,
		/// Index of this segment's first group in the pattern-wide numbering.
		first_group: usize,
		groups: usize,
	},
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetPart {
	Literal(String),
	Capture(usize),
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
	pattern: String,
	target: String,
	absolute: bool,
	segments: Vec<PatternSegment>,
	target_parts: Vec<TargetPart>,
	/// Matches internal paths produced by this rule.
	target_regex: Regex,
	/// Capture number for each group of `target_regex`, in order.
	target_captures: Vec<usize>,
}

impl RewriteRule {
	/// Compiles a rule.
	///
	/// # Errors
	///
	/// Fails if either side is too long, a `regex:` segment does not compile,
	/// or the target references a group the pattern does not define.
	pub fn new(pattern: &str, target: &str) -> Result<Self, RewriteError> {
		for s in [pattern, target] {
			if s.len() > MAX_RULE_PATTERN_LENGTH {
				return Err(RewriteError::TooLong {
					length: s.len(),
					max: MAX_RULE_PATTERN_LENGTH,
				});
			}
		}

		let mut segments = Vec::new();
		let mut total_groups = 0;
		for segment in split_segments(pattern) {
			match segment.strip_prefix(REGEX_SEGMENT_PREFIX) {
				Some(source) => {
					let regex = compile(&format!("^(?:{})$", source)).map_err(|e| {
						RewriteError::InvalidRegex {
							pattern: pattern.to_string(),
							segment: segment.to_string(),
							message: e.to_string(),
						}
					})?;
					let groups = regex.captures_len() - 1;
					segments.push(PatternSegment::Regex {
						regex,
						first_group: total_groups + 1,
						groups,
					});
					total_groups += groups;
				}
				None => segments.push(PatternSegment::Literal(segment.to_string())),
			}
		}

		let target_parts = parse_target(target);
		if let Some(index) = target_parts.iter().find_map(|part| match part {
			TargetPart::Capture(n) if *n == 0 || *n > total_groups => Some(*n),
			_ => None,
		}) {
			return Err(RewriteError::UnknownCapture {
				pattern: pattern.to_string(),
				target: target.to_string(),
				index,
				captures: total_groups,
			});
		}

		let mut target_source = String::from("^/?");
		let mut target_captures = Vec::new();
		for part in parse_target(target.trim_matches('/')) {
			match part {
				TargetPart::Literal(text) => target_source.push_str(&regex::escape(&text)),
				TargetPart::Capture(n) => {
					target_source.push_str("([^/]+)");
					target_captures.push(n);
				}
			}
		}
		target_source.push_str("/?$");
		let target_regex = compile(&target_source).map_err(|e| RewriteError::InvalidRegex {
			pattern: pattern.to_string(),
			segment: target.to_string(),
			message: e.to_string(),
		})?;

		Ok(Self {
			pattern: pattern.to_string(),
			target: target.to_string(),
			absolute: pattern.starts_with('/'),
			segments,
			target_parts,
			target_regex,
			target_captures,
		})
	}

	/// Returns the external pattern.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the internal target.
	pub fn target(&self) -> &str {
		&self.target
	}

	/// Matches `path` against the pattern and returns captures in pattern
	/// order, or `None` if any segment fails.
	fn match_pattern(&self, path: &str) -> Option<Vec<String>> {
		let url_segments: Vec<&str> = split_segments(path).collect();
		if url_segments.len() != self.segments.len() {
			return None;
		}

		let mut captures = Vec::new();
		for (segment, value) in self.segments.iter().zip(url_segments) {
			match segment {
				PatternSegment::Literal(literal) => {
					if literal != value {
						return None;
					}
				}
				PatternSegment::Regex { regex, groups, .. } => {
					let caps = regex.captures(value)?;
					captures.extend(
						(1..=*groups).map(|i| caps.get(i).map_or("", |m| m.as_str()).to_string()),
					);
				}
			}
		}
		Some(captures)
	}

	fn to_internal(&self, path: &str) -> Option<String> {
		let captures = self.match_pattern(path)?;
		let mut out = String::new();
		for part in &self.target_parts {
			match part {
				TargetPart::Literal(text) => out.push_str(text),
				TargetPart::Capture(n) => out.push_str(&captures[n - 1]),
			}
		}
		Some(out)
	}

	fn to_external(&self, path: &str) -> Option<String> {
		let caps = self.target_regex.captures(path)?;

		let mut bound: Vec<Option<&str>> = vec![None; self.total_groups() + 1];
		for (i, n) in self.target_captures.iter().enumerate() {
			let value = caps.get(i + 1)?.as_str();
			// A group referenced twice must bind the same text both times
			let slot = &mut bound[*n];
			if slot.is_some_and(|existing| existing != value) {
				return None;
			}
			*slot = Some(value);
		}

		let mut rebuilt = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			match segment {
				PatternSegment::Literal(literal) => rebuilt.push(literal.clone()),
				PatternSegment::Regex {
					regex,
					first_group,
					groups,
				} => {
					if *groups != 1 {
						return None;
					}
					let value = bound[*first_group]?;
					if !regex.is_match(value) {
						return None;
					}
					rebuilt.push(value.to_string());
				}
			}
		}

		let joined = rebuilt.join("/");
		Some(if self.absolute {
			format!("/{}", joined)
		} else {
			joined
		})
	}

	fn total_groups(&self) -> usize {
		self.segments
			.iter()
			.map(|s| match s {
				PatternSegment::Regex { groups, .. } => *groups,
				PatternSegment::Literal(_) => 0,
			})
			.sum()
	}
}

/// An ordered rewrite table. The first matching rule wins.
///
/// Lookups take `&self`, so a built table can be shared behind an `Arc`
/// and queried concurrently.
#[derive(Debug, Clone, Default)]
pub struct UrlRewriter {
	rules: Vec<RewriteRule>,
}

impl UrlRewriter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Compiles and appends a rule.
	pub fn add_rule(&mut self, pattern: &str, target: &str) -> Result<&mut Self, RewriteError> {
		let rule = RewriteRule::new(pattern, target)?;
		tracing::debug!(pattern, target, "registered rewrite rule");
		self.rules.push(rule);
		Ok(self)
	}

	/// Builder form of [`add_rule`](Self::add_rule).
	pub fn with_rule(mut self, pattern: &str, target: &str) -> Result<Self, RewriteError> {
		self.add_rule(pattern, target)?;
		Ok(self)
	}

	pub fn rules(&self) -> &[RewriteRule] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Rewrites the path of `url` in the given direction.
	///
	/// Returns `url` unchanged when no rule applies. In the `ToExternal`
	/// direction a path that already matches some rule's pattern is left
	/// alone, so applying the rewrite twice equals applying it once.
	pub fn get(&self, url: &str, direction: RewriteDirection) -> String {
		let parts = UrlParts::new(url);
		let path = parts.path();

		let rewritten = match direction {
			RewriteDirection::ToInternal => self.rules.iter().find_map(|r| r.to_internal(path)),
			RewriteDirection::ToExternal => {
				if self.rules.iter().any(|r| r.match_pattern(path).is_some()) {
					None
				} else {
					self.rules.iter().find_map(|r| r.to_external(path))
				}
			}
		};

		match rewritten {
			Some(new_path) => {
				tracing::trace!(url, path = %new_path, ?direction, "rewrote url");
				parts.with_path(new_path).to_url()
			}
			None => url.to_string(),
		}
	}
}

/// Rewrites `url` with `rewriter`. See [`UrlRewriter::get`].
pub fn rewrite(rewriter: &UrlRewriter, url: &str, direction: RewriteDirection) -> String {
	rewriter.get(url, direction)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
	let trimmed = path.trim_matches('/');
	trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

fn compile(source: &str) -> Result<Regex, regex::Error> {
	RegexBuilder::new(source)
		.size_limit(MAX_RULE_REGEX_SIZE)
		.build()
}

/// Splits a target into literal text and `$n` references. A `$` not
/// followed by a digit is literal.
fn parse_target(target: &str) -> Vec<TargetPart> {
	let mut parts = Vec::new();
	let mut literal = String::new();
	let mut chars = target.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '$' && chars.peek().is_some_and(char::is_ascii_digit) {
			let mut digits = String::new();
			while let Some(d) = chars.next_if(char::is_ascii_digit) {
				digits.push(d);
			}
			if !literal.is_empty() {
				parts.push(TargetPart::Literal(std::mem::take(&mut literal)));
			}
			// Overlong digit runs cannot name a real group
			parts.push(TargetPart::Capture(digits.parse().unwrap_or(usize::MAX)));
		} else {
			literal.push(c);
		}
	}
	if !literal.is_empty() {
		parts.push(TargetPart::Literal(literal));
	}
	parts
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn blog_rewriter() -> UrlRewriter {
		UrlRewriter::new()
			.with_rule("/blog/regex:(\\d+)", "/pages/post/$1")
			.unwrap()
			.with_rule("/about", "/pages/about")
			.unwrap()
	}

	#[rstest]
	#[case("/blog/42", "/pages/post/42")]
	#[case("/blog/42/", "/pages/post/42")]
	#[case("/about", "/pages/about")]
	#[case("/blog/abc", "/blog/abc")]
	#[case("/blog/42/comments", "/blog/42/comments")]
	#[case("/unknown", "/unknown")]
	fn test_to_internal(#[case] url: &str, #[case] expected: &str) {
		assert_eq!(blog_rewriter().get(url, RewriteDirection::ToInternal), expected);
	}

	#[rstest]
	#[case("/pages/post/42", "/blog/42")]
	#[case("/pages/about", "/about")]
	#[case("/pages/other", "/pages/other")]
	fn test_to_external(#[case] url: &str, #[case] expected: &str) {
		assert_eq!(blog_rewriter().get(url, RewriteDirection::ToExternal), expected);
	}

	#[rstest]
	fn test_to_external_is_idempotent() {
		let rewriter = blog_rewriter();
		let once = rewriter.get("/pages/post/7", RewriteDirection::ToExternal);
		let twice = rewriter.get(&once, RewriteDirection::ToExternal);
		assert_eq!(once, twice);
	}

	#[rstest]
	fn test_query_and_fragment_preserved() {
		let rewriter = blog_rewriter();
		assert_eq!(
			rewriter.get("/blog/5?ref=home#c", RewriteDirection::ToInternal),
			"/pages/post/5?ref=home#c"
		);
	}

	#[rstest]
	fn test_first_rule_wins() {
		let rewriter = UrlRewriter::new()
			.with_rule("/a/regex:(.+)", "/first/$1")
			.unwrap()
			.with_rule("/a/regex:(\\d+)", "/second/$1")
			.unwrap();
		assert_eq!(rewriter.get("/a/1", RewriteDirection::ToInternal), "/first/1");
	}

	#[rstest]
	fn test_multiple_captures_across_segments() {
		let rewriter = UrlRewriter::new()
			.with_rule(
				"/archive/regex:(\\d{4})/regex:(\\d{2})",
				"/pages/archive/$1-$2",
			)
			.unwrap();
		assert_eq!(
			rewriter.get("/archive/2024/05", RewriteDirection::ToInternal),
			"/pages/archive/2024-05"
		);
		assert_eq!(
			rewriter.get("/pages/archive/2024-05", RewriteDirection::ToExternal),
			"/archive/2024/05"
		);
	}

	#[rstest]
	fn test_literal_dollar_in_target() {
		let rewriter = UrlRewriter::new().with_rule("/pay", "/pages/$pay").unwrap();
		assert_eq!(rewriter.get("/pay", RewriteDirection::ToInternal), "/pages/$pay");
	}

	#[rstest]
	fn test_invalid_regex_fails_fast() {
		let err = UrlRewriter::new().with_rule("/x/regex:(", "/y").unwrap_err();
		assert!(matches!(err, RewriteError::InvalidRegex { ref segment, .. } if segment == "regex:("));
	}

	#[rstest]
	#[case("/x/regex:(\\d+)", "/y/$2", 2)]
	#[case("/x", "/y/$1", 1)]
	#[case("/x/regex:(\\d+)", "/y/$0", 0)]
	fn test_unknown_capture_fails_fast(#[case] pattern: &str, #[case] target: &str, #[case] index: usize) {
		let err = UrlRewriter::new().with_rule(pattern, target).unwrap_err();
		assert!(matches!(err, RewriteError::UnknownCapture { index: i, .. } if i == index));
	}

	#[rstest]
	fn test_multi_group_segment_is_not_reversible() {
		let rewriter = UrlRewriter::new()
			.with_rule("/d/regex:(\\d+)-(\\d+)", "/pages/range/$1/$2")
			.unwrap();
		assert_eq!(rewriter.get("/d/1-2", RewriteDirection::ToInternal), "/pages/range/1/2");
		assert_eq!(
			rewriter.get("/pages/range/1/2", RewriteDirection::ToExternal),
			"/pages/range/1/2"
		);
	}

	#[rstest]
	fn test_reverse_value_must_satisfy_regex() {
		let rewriter = UrlRewriter::new()
			.with_rule("/blog/regex:(\\d+)", "/pages/post/$1")
			.unwrap();
		assert_eq!(
			rewriter.get("/pages/post/draft", RewriteDirection::ToExternal),
			"/pages/post/draft"
		);
	}

	#[rstest]
	fn test_relative_pattern_keeps_relative_form() {
		let rewriter = UrlRewriter::new().with_rule("docs/regex:(\\w+)", "/pages/docs/$1").unwrap();
		assert_eq!(rewriter.get("/pages/docs/intro", RewriteDirection::ToExternal), "docs/intro");
	}

	#[rstest]
	fn test_empty_rewriter_is_identity() {
		let rewriter = UrlRewriter::new();
		assert!(rewriter.is_empty());
		assert_eq!(rewriter.get("/a?b#c", RewriteDirection::ToInternal), "/a?b#c");
		assert_eq!(rewrite(&rewriter, "/a", RewriteDirection::ToExternal), "/a");
	}

	#[rstest]
	fn test_add_rule_chains() {
		let mut rewriter = UrlRewriter::new();
		rewriter
			.add_rule("/a", "/pages/a")
			.unwrap()
			.add_rule("/b", "/pages/b")
			.unwrap();
		assert_eq!(rewriter.len(), 2);
		assert_eq!(rewriter.rules()[1].pattern(), "/b");
		assert_eq!(rewriter.rules()[1].target(), "/pages/b");
	}

	#[rstest]
	fn test_direction_serializes_snake_case() {
		assert_eq!(
			serde_json::to_string(&RewriteDirection::ToInternal).unwrap(),
			"\"to_internal\""
		);
	}
}
