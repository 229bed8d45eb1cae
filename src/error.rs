use std::path::PathBuf;

/// Library-level structured errors for srcpatch.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
	#[error("Plan file not found: {path}")]
	PlanNotFound { path: PathBuf },

	#[error("Failed to read plan file: {path}")]
	PlanReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse plan file: {path}")]
	PlanParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution in rule: {input} ({reason})")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Rule matcher must not be empty")]
	EmptyMatcher,

	#[error("Invalid rule {rule_index}")]
	InvalidRule {
		rule_index: usize,
		#[source]
		source: Box<PatchError>,
	},

	#[error("Rule {rule_index} needs one of: literal, regex, substitute")]
	MissingMatcher { rule_index: usize },

	#[error("Rule {rule_index}: {field} is required")]
	MissingField {
		rule_index: usize,
		field: &'static str,
	},

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Failed to read source file: {path}")]
	ReadFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write source file: {path}")]
	WriteFailed {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Required rule {rule_index}{} did not match; searched near:\n{snippet}", label_suffix(.label))]
	PatternNotFound {
		rule_index: usize,
		label: Option<String>,
		snippet: String,
	},
}

fn label_suffix(label: &Option<String>) -> String {
	match label {
		Some(label) => format!(" ({label})"),
		None => String::new(),
	}
}

impl PatchError {
	/// Index of the rule that caused this error, when there is one.
	pub fn rule_index(&self) -> Option<usize> {
		match self {
			PatchError::InvalidRule { rule_index, .. }
			| PatchError::MissingMatcher { rule_index }
			| PatchError::MissingField { rule_index, .. }
			| PatchError::PatternNotFound { rule_index, .. } => Some(*rule_index),
			_ => None,
		}
	}
}

/// Result type alias using PatchError.
pub type Result<T> = std::result::Result<T, PatchError>;
