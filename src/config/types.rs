use crate::error::{PatchError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level patch plan from a `.srcpatch.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
	/// The file to patch. Relative paths resolve against the plan's directory.
	pub target: PathBuf,

	/// Transformation steps, applied in order.
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
}

/// One transformation step as written in the plan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RuleSpec {
	/// Human-readable name shown in logs, reports and errors.
	pub label: Option<String>,

	/// Exact substring to match (mutually exclusive with regex and substitute).
	pub literal: Option<String>,

	/// Regex to match (mutually exclusive with literal and substitute).
	/// The replacement may reference capture groups as `$1` or `${name}`.
	pub regex: Option<String>,

	/// Sed-like substitution (mutually exclusive with literal and regex).
	/// Format: "s/pattern/replacement/" or "s/pattern/replacement/g" for global.
	pub substitute: Option<String>,

	/// Replacement text for literal and regex matchers.
	pub replacement: Option<String>,

	/// Replace every occurrence instead of only the first.
	#[serde(default)]
	pub all: bool,

	/// Fail the whole run when the matcher is not found.
	#[serde(default)]
	pub required: bool,

	/// Skip this rule when the buffer already contains this text.
	pub unless_contains: Option<String>,
}

/// A loaded plan with its source path for resolution and display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed plan.
	pub config: Config,

	/// The path this plan was loaded from.
	pub path: PathBuf,
}

impl RuleSpec {
	/// Validate matcher selection and replacement presence.
	pub fn validate(&self, rule_index: usize) -> Result<()> {
		let matcher_fields = [
			("literal", self.literal.is_some()),
			("regex", self.regex.is_some()),
			("substitute", self.substitute.is_some()),
		];

		let set_fields: Vec<_> = matcher_fields
			.iter()
			.filter(|(_, is_set)| *is_set)
			.map(|(name, _)| *name)
			.collect();

		match set_fields.as_slice() {
			[] => return Err(PatchError::MissingMatcher { rule_index }),
			[_] => {}
			[first, second, ..] => {
				return Err(PatchError::MutuallyExclusive {
					option1: first.to_string(),
					option2: second.to_string(),
				});
			}
		}

		if self.substitute.is_some() {
			if self.replacement.is_some() {
				return Err(PatchError::MutuallyExclusive {
					option1: "substitute".to_string(),
					option2: "replacement".to_string(),
				});
			}
		} else if self.replacement.is_none() {
			return Err(PatchError::MissingField {
				rule_index,
				field: "replacement",
			});
		}

		Ok(())
	}
}

impl Config {
	/// Validate all rules in this plan.
	pub fn validate(&self) -> Result<()> {
		for (index, rule) in self.rules.iter().enumerate() {
			rule.validate(index)?;
		}
		Ok(())
	}

	/// Resolve the target path relative to the directory holding the plan.
	pub fn target_path(&self, plan_path: &Path) -> PathBuf {
		if self.target.is_absolute() {
			return self.target.clone();
		}
		match plan_path.parent() {
			Some(dir) => dir.join(&self.target),
			None => self.target.clone(),
		}
	}
}

impl LoadedConfig {
	/// The resolved path of the file this plan patches.
	pub fn target_path(&self) -> PathBuf {
		self.config.target_path(&self.path)
	}
}
