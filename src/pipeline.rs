//! Ordered application of pattern rules to a source buffer.

use crate::config::types::Config;
use crate::error::{PatchError, Result};
use crate::rules::{Matcher, Outcome, PatternRule};
use std::fmt;
use tracing::{debug, warn};

/// Upper bound on the characters quoted in a `PatternNotFound` snippet.
const SNIPPET_MAX_CHARS: usize = 600;

/// Lines quoted from the buffer head when no anchor line can be located.
const SNIPPET_HEAD_LINES: usize = 5;

/// Record of one step in a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
	pub rule_index: usize,
	pub label: Option<String>,
	pub outcome: Outcome,
}

impl fmt::Display for StepRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]", self.rule_index)?;
		if let Some(ref label) = self.label {
			write!(f, " {label}")?;
		}
		write!(f, ": {}", self.outcome)
	}
}

/// Final buffer plus the per-step records of a successful run.
#[derive(Debug)]
pub struct PipelineOutcome {
	pub output: String,
	pub steps: Vec<StepRecord>,
}

impl PipelineOutcome {
	/// Number of rules that rewrote the buffer.
	pub fn applied(&self) -> usize {
		self.steps.iter().filter(|s| !s.outcome.is_noop()).count()
	}

	/// Number of rules that left the buffer unchanged (unmatched or skipped).
	pub fn noops(&self) -> usize {
		self.steps.iter().filter(|s| s.outcome.is_noop()).count()
	}

	/// Number of rules skipped because their guard text was present.
	pub fn skipped(&self) -> usize {
		self.steps
			.iter()
			.filter(|s| s.outcome == Outcome::Skipped)
			.count()
	}
}

/// An ordered, immutable sequence of rules.
///
/// Rule `i` always sees the output of rule `i - 1`; rule 0 sees the input.
#[derive(Debug, Clone, Default)]
pub struct TransformationPipeline {
	rules: Vec<PatternRule>,
}

impl TransformationPipeline {
	pub fn new(rules: Vec<PatternRule>) -> Self {
		TransformationPipeline { rules }
	}

	/// Compile every rule of a plan. Fails on the first invalid rule.
	pub fn from_config(config: &Config) -> Result<Self> {
		let rules = config
			.rules
			.iter()
			.enumerate()
			.map(|(index, spec)| PatternRule::from_spec(index, spec))
			.collect::<Result<Vec<_>>>()?;
		Ok(Self::new(rules))
	}

	pub fn rules(&self) -> &[PatternRule] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Thread `initial` through every rule in order.
	///
	/// An unmatched required rule aborts the run with
	/// [`PatchError::PatternNotFound`]; intermediate buffers are dropped.
	pub fn run(&self, initial: String) -> Result<PipelineOutcome> {
		let mut buffer = initial;
		let mut steps = Vec::with_capacity(self.rules.len());

		for (rule_index, rule) in self.rules.iter().enumerate() {
			let label = rule.label().map(str::to_string);
			let applied = rule.apply(buffer);

			match applied.outcome {
				Outcome::NotFound if rule.is_required() => {
					return Err(PatchError::PatternNotFound {
						rule_index,
						label,
						snippet: snippet_near(&applied.output, rule.matcher()),
					});
				}
				Outcome::NotFound => {
					warn!(rule_index, label = ?label, "optional rule did not match, continuing");
				}
				outcome => {
					debug!(rule_index, label = ?label, %outcome, "rule applied");
				}
			}

			steps.push(StepRecord {
				rule_index,
				label,
				outcome: applied.outcome,
			});
			buffer = applied.output;
		}

		Ok(PipelineOutcome {
			output: buffer,
			steps,
		})
	}
}

/// Quote the part of `buffer` most likely meant by `matcher`.
///
/// For literal matchers, looks for the first non-blank matcher line and quotes
/// as many buffer lines as the matcher spans from there. Otherwise quotes the
/// head of the buffer.
fn snippet_near(buffer: &str, matcher: &Matcher) -> String {
	if buffer.is_empty() {
		return "<empty buffer>".to_string();
	}

	let lines: Vec<&str> = buffer.lines().collect();
	let anchored = match matcher {
		Matcher::Literal(needle) => needle
			.lines()
			.map(str::trim)
			.find(|line| !line.is_empty())
			.and_then(|anchor| lines.iter().position(|line| line.contains(anchor)))
			.map(|start| (start, needle.lines().count().max(1))),
		Matcher::Regex(_) => None,
	};

	let (start, len) = anchored.unwrap_or((0, SNIPPET_HEAD_LINES));
	let mut snippet = lines
		.iter()
		.enumerate()
		.skip(start)
		.take(len)
		.map(|(number, line)| format!("  {:>4} | {line}", number + 1))
		.collect::<Vec<_>>()
		.join("\n");

	if snippet.chars().count() > SNIPPET_MAX_CHARS {
		snippet = snippet.chars().take(SNIPPET_MAX_CHARS).collect();
		snippet.push_str("\n  ...");
	}
	snippet
}
