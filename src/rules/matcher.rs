use crate::error::{PatchError, Result};
use regex::Regex;

/// How many occurrences a rule rewrites per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
	/// Only the leftmost occurrence.
	#[default]
	First,
	/// Every non-overlapping occurrence, scanned left to right.
	All,
}

/// The pattern half of a rule.
#[derive(Debug, Clone)]
pub enum Matcher {
	/// Exact substring. Replacement text is inserted verbatim.
	Literal(String),
	/// Regular expression. Replacement text may reference capture groups.
	Regex(Regex),
}

impl Matcher {
	/// Build a literal matcher, rejecting the empty string.
	pub fn literal(needle: impl Into<String>) -> Result<Self> {
		let needle = needle.into();
		if needle.is_empty() {
			return Err(PatchError::EmptyMatcher);
		}
		Ok(Matcher::Literal(needle))
	}

	/// Compile a regex matcher, rejecting the empty pattern.
	pub fn regex(pattern: &str) -> Result<Self> {
		if pattern.is_empty() {
			return Err(PatchError::EmptyMatcher);
		}
		compile_regex(pattern).map(Matcher::Regex)
	}

	/// The matcher's source text (the literal, or the regex pattern).
	pub fn as_str(&self) -> &str {
		match self {
			Matcher::Literal(needle) => needle,
			Matcher::Regex(regex) => regex.as_str(),
		}
	}

	/// Whether the matcher occurs anywhere in `haystack`.
	pub fn is_match(&self, haystack: &str) -> bool {
		match self {
			Matcher::Literal(needle) => haystack.contains(needle.as_str()),
			Matcher::Regex(regex) => regex.is_match(haystack),
		}
	}

	/// Replace occurrences in a single left-to-right pass.
	///
	/// Returns the new text and the number of occurrences replaced, or `None`
	/// when nothing matched. Replaced text is never re-scanned.
	pub fn replace(
		&self,
		haystack: &str,
		replacement: &str,
		cardinality: Cardinality,
	) -> Option<(String, usize)> {
		if !self.is_match(haystack) {
			return None;
		}

		let rewritten = match (self, cardinality) {
			(Matcher::Literal(needle), Cardinality::First) => {
				(haystack.replacen(needle.as_str(), replacement, 1), 1)
			}
			(Matcher::Literal(needle), Cardinality::All) => {
				let count = haystack.matches(needle.as_str()).count();
				(haystack.replace(needle.as_str(), replacement), count)
			}
			(Matcher::Regex(regex), Cardinality::First) => {
				(regex.replacen(haystack, 1, replacement).into_owned(), 1)
			}
			(Matcher::Regex(regex), Cardinality::All) => {
				let count = regex.find_iter(haystack).count();
				(regex.replace_all(haystack, replacement).into_owned(), count)
			}
		};

		Some(rewritten)
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| PatchError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
