//! Patch plan loading and parsing for srcpatch.
//!
//! This module handles:
//! - TOML plan file parsing
//! - Rule validation (matcher selection, replacement presence)
//! - Target path resolution relative to the plan

pub mod parser;
pub mod types;

pub use parser::{parse_plan_file, parse_plan_str};
pub use types::{Config, LoadedConfig, RuleSpec};

/// Default plan file name looked up in the current directory.
pub const DEFAULT_PLAN_FILE: &str = ".srcpatch.toml";
