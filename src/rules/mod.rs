//! Pattern rules for srcpatch.
//!
//! This module handles:
//! - Literal and regex matching with first/all cardinality
//! - Sed-like substitution parsing
//! - Compiling plan rules into immutable, validated `PatternRule`s

pub mod matcher;
pub mod pattern;
pub mod rewriter;

pub use matcher::{Cardinality, Matcher};
pub use pattern::{Outcome, PatternRule, RuleApplication};
pub use rewriter::Substitution;
