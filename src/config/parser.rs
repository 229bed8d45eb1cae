use crate::config::types::{Config, LoadedConfig};
use crate::error::{PatchError, Result};
use std::path::Path;

/// Parse a plan file from the given path.
pub fn parse_plan_file(path: &Path) -> Result<LoadedConfig> {
	if !path.exists() {
		return Err(PatchError::PlanNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|source| PatchError::PlanReadError {
		path: path.to_path_buf(),
		source,
	})?;

	let config = parse_plan_str(&content, path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Parse a plan from a string (useful for testing).
pub fn parse_plan_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config = toml::from_str(content).map_err(|source| PatchError::PlanParseError {
		path: path.to_path_buf(),
		source,
	})?;

	// Validate the parsed plan
	config.validate()?;

	Ok(config)
}
