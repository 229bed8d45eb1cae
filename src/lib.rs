//! srcpatch - CLI tool for applying ordered, reproducible text patches to a source file.
//!
//! This library provides the core functionality for srcpatch, including:
//! - Patch plan parsing and validation
//! - Literal, regex and sed-like pattern rules
//! - The ordered transformation pipeline and its failure policy
//! - The read-transform-write runner with atomic replacement on disk
//!
//! # Example
//!
//! ```no_run
//! use srcpatch_cli::pipeline::TransformationPipeline;
//! use srcpatch_cli::rules::PatternRule;
//! use srcpatch_cli::runner::PatchRunner;
//! use std::path::Path;
//!
//! let pipeline = TransformationPipeline::new(vec![
//!     PatternRule::literal("import X from 'x';", "import X from 'x';\nimport Y from 'y';")
//!         .unwrap()
//!         .required()
//!         .unless_contains("import Y from 'y';"),
//! ]);
//!
//! let report = PatchRunner::new().run(Path::new("src/index.ts"), &pipeline).unwrap();
//! println!("{report}");
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod runner;
pub mod telemetry;
pub mod template;

pub use error::{PatchError, Result};
