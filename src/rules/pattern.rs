use crate::config::types::RuleSpec;
use crate::error::{PatchError, Result};
use crate::rules::matcher::{Cardinality, Matcher};
use crate::rules::rewriter::Substitution;
use std::fmt;

/// What happened when a rule was applied to a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// The matcher was found and `count` occurrences were replaced.
	Replaced { count: usize },
	/// The matcher was not found; the buffer is unchanged.
	NotFound,
	/// The rule's guard text was already present; the rule did not run.
	Skipped,
}

impl Outcome {
	/// Whether this outcome left the buffer untouched.
	pub fn is_noop(&self) -> bool {
		!matches!(self, Outcome::Replaced { .. })
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outcome::Replaced { count: 1 } => write!(f, "applied (1 replacement)"),
			Outcome::Replaced { count } => write!(f, "applied ({count} replacements)"),
			Outcome::NotFound => write!(f, "no match"),
			Outcome::Skipped => write!(f, "skipped (already present)"),
		}
	}
}

/// Result of applying one rule: the outcome and the buffer to hand on.
#[derive(Debug)]
pub struct RuleApplication {
	pub outcome: Outcome,
	pub output: String,
}

impl RuleApplication {
	/// Whether the matcher was found.
	pub fn matched(&self) -> bool {
		matches!(self.outcome, Outcome::Replaced { .. })
	}
}

/// A compiled transformation step.
#[derive(Debug, Clone)]
pub struct PatternRule {
	matcher: Matcher,
	replacement: String,
	cardinality: Cardinality,
	required: bool,
	guard: Option<String>,
	label: Option<String>,
}

impl PatternRule {
	/// A rule replacing an exact substring with verbatim text.
	pub fn literal(needle: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
		Ok(Self::with_matcher(Matcher::literal(needle)?, replacement.into()))
	}

	/// A rule replacing regex matches; the replacement may use `$1` / `${name}`.
	pub fn regex(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
		Ok(Self::with_matcher(Matcher::regex(pattern)?, replacement.into()))
	}

	/// A rule from sed-like syntax, e.g. `s/foo/bar/g`.
	pub fn substitute(expression: &str) -> Result<Self> {
		let sub = Substitution::parse(expression)?;
		let mut rule = Self::with_matcher(sub.matcher, sub.replacement);
		rule.cardinality = sub.cardinality;
		Ok(rule)
	}

	fn with_matcher(matcher: Matcher, replacement: String) -> Self {
		PatternRule {
			matcher,
			replacement,
			cardinality: Cardinality::First,
			required: false,
			guard: None,
			label: None,
		}
	}

	/// Compile a rule as declared in a plan. Errors carry the rule's index.
	pub fn from_spec(rule_index: usize, spec: &RuleSpec) -> Result<Self> {
		spec.validate(rule_index)?;
		Self::compile_spec(spec).map_err(|source| PatchError::InvalidRule {
			rule_index,
			source: Box::new(source),
		})
	}

	fn compile_spec(spec: &RuleSpec) -> Result<Self> {
		let replacement = spec.replacement.clone().unwrap_or_default();
		let mut rule = match (&spec.literal, &spec.regex, &spec.substitute) {
			(Some(literal), _, _) => Self::literal(literal.as_str(), replacement)?,
			(_, Some(pattern), _) => Self::regex(pattern, replacement)?,
			(_, _, Some(expression)) => Self::substitute(expression)?,
			(None, None, None) => return Err(PatchError::EmptyMatcher),
		};

		if spec.all {
			rule = rule.replace_all();
		}
		if spec.required {
			rule = rule.required();
		}
		if let Some(ref guard) = spec.unless_contains {
			rule = rule.unless_contains(guard.as_str());
		}
		if let Some(ref label) = spec.label {
			rule = rule.with_label(label.as_str());
		}
		Ok(rule)
	}

	/// Rewrite every occurrence rather than the first.
	pub fn replace_all(mut self) -> Self {
		self.cardinality = Cardinality::All;
		self
	}

	/// Make a missing match abort the pipeline.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Skip the rule when `guard` is already in the buffer.
	pub fn unless_contains(mut self, guard: impl Into<String>) -> Self {
		self.guard = Some(guard.into());
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn matcher(&self) -> &Matcher {
		&self.matcher
	}

	pub fn replacement(&self) -> &str {
		&self.replacement
	}

	pub fn cardinality(&self) -> Cardinality {
		self.cardinality
	}

	pub fn is_required(&self) -> bool {
		self.required
	}

	pub fn guard(&self) -> Option<&str> {
		self.guard.as_deref()
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	/// Apply this rule to a buffer in one pass.
	///
	/// Never fails: an absent matcher yields [`Outcome::NotFound`] with the
	/// buffer handed back untouched. Enforcing `required` is the pipeline's job.
	pub fn apply(&self, buffer: String) -> RuleApplication {
		if let Some(ref guard) = self.guard
			&& buffer.contains(guard.as_str())
		{
			return RuleApplication {
				outcome: Outcome::Skipped,
				output: buffer,
			};
		}

		match self
			.matcher
			.replace(&buffer, &self.replacement, self.cardinality)
		{
			Some((output, count)) => RuleApplication {
				outcome: Outcome::Replaced { count },
				output,
			},
			None => RuleApplication {
				outcome: Outcome::NotFound,
				output: buffer,
			},
		}
	}
}
