use crate::error::{PatchError, Result};
use crate::rules::matcher::{Cardinality, Matcher};

/// Parsed substitution command (sed-like syntax).
#[derive(Debug)]
pub struct Substitution {
	/// The regex to match.
	pub matcher: Matcher,

	/// The replacement template.
	pub replacement: String,

	/// `All` when the global flag is present.
	pub cardinality: Cardinality,
}

impl Substitution {
	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| PatchError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Err(invalid("substitution must start with 's'"));
		}

		// The delimiter is the character after 's'
		let delimiter = chars.next().ok_or_else(|| invalid("substitution too short"))?;
		if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
			return Err(invalid("delimiter must be punctuation"));
		}

		let parts = split_by_delimiter(chars.as_str(), delimiter);

		let [pattern, replacement, rest @ ..] = parts.as_slice() else {
			return Err(invalid("substitution must have pattern and replacement"));
		};

		let flags = match rest {
			[] => "",
			[flags] => flags.as_str(),
			_ => return Err(invalid("too many delimiters")),
		};

		let cardinality = match flags {
			"" => Cardinality::First,
			"g" => Cardinality::All,
			_ => return Err(invalid("unsupported flags (only 'g' is recognised)")),
		};

		Ok(Substitution {
			matcher: Matcher::regex(pattern)?,
			replacement: replacement.clone(),
			cardinality,
		})
	}
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();
	let mut escape_next = false;

	while let Some(c) = chars.next() {
		if escape_next {
			current.push(c);
			escape_next = false;
		} else if c == '\\' {
			// Check if we're escaping the delimiter
			if chars.peek() == Some(&delimiter) {
				escape_next = true;
			} else {
				current.push(c);
			}
		} else if c == delimiter {
			parts.push(current);
			current = String::new();
		} else {
			current.push(c);
		}
	}

	// Trailing flags (possibly empty) form the last part
	parts.push(current);

	parts
}
