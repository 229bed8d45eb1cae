//! Read-transform-write orchestration for a single target file.
//!
//! The file is read once at entry and written once at the single success
//! exit. Any failure before the write leaves the target untouched.

use crate::error::{PatchError, Result};
use crate::pipeline::{StepRecord, TransformationPipeline};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The I/O collaborator: whole-file text reads and writes.
pub trait TextStore {
	fn read_text(&self, path: &Path) -> Result<String>;
	fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}

/// Filesystem store. Writes go to a sibling temp file which then replaces
/// the target, so readers never observe a half-written file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl TextStore for FsStore {
	fn read_text(&self, path: &Path) -> Result<String> {
		std::fs::read_to_string(path).map_err(|source| PatchError::ReadFailed {
			path: path.to_path_buf(),
			source,
		})
	}

	fn write_text(&self, path: &Path, content: &str) -> Result<()> {
		let write_failed = |source: std::io::Error| PatchError::WriteFailed {
			path: path.to_path_buf(),
			source,
		};

		// Replace the file a symlink points at, not the link itself
		let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
		let dir = match resolved.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir,
			_ => Path::new("."),
		};

		let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
		tmp.write_all(content.as_bytes()).map_err(write_failed)?;
		tmp.as_file().sync_all().map_err(write_failed)?;

		// Keep the target's mode; the temp file is created 0600
		if let Ok(metadata) = std::fs::metadata(&resolved) {
			tmp.as_file()
				.set_permissions(metadata.permissions())
				.map_err(write_failed)?;
		}

		tmp.persist(&resolved).map_err(|e| write_failed(e.error))?;
		Ok(())
	}
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
	/// The patched content was written back.
	Written,
	/// Every rule was a no-op; the file was left alone.
	Unchanged,
	/// Dry run: the pipeline succeeded but nothing was written.
	DryRun,
}

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
	pub path: PathBuf,
	pub rules_total: usize,
	pub applied: usize,
	pub noops: usize,
	pub skipped: usize,
	pub status: RunStatus,
	pub steps: Vec<StepRecord>,
}

impl fmt::Display for RunReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let verb = match self.status {
			RunStatus::Written => "Patched",
			RunStatus::Unchanged => "Already up to date:",
			RunStatus::DryRun => "Dry run for",
		};
		write!(
			f,
			"{verb} {} ({} of {} rules applied, {} no-op)",
			self.path.display(),
			self.applied,
			self.rules_total,
			self.noops
		)
	}
}

/// Runs a pipeline against one file through a [`TextStore`].
#[derive(Debug, Default)]
pub struct PatchRunner<S = FsStore> {
	store: S,
	dry_run: bool,
}

impl PatchRunner<FsStore> {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<S: TextStore> PatchRunner<S> {
	pub fn with_store(store: S) -> Self {
		PatchRunner {
			store,
			dry_run: false,
		}
	}

	/// Run the pipeline and report, but never write.
	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// Read `path`, run `pipeline` over its content, and write the result back.
	///
	/// A read failure aborts before any rule runs. A pipeline failure is
	/// returned as-is and nothing is written.
	pub fn run(&self, path: &Path, pipeline: &TransformationPipeline) -> Result<RunReport> {
		let original = self.store.read_text(path)?;
		debug!(path = %path.display(), bytes = original.len(), rules = pipeline.len(), "read target");

		let outcome = pipeline.run(original.clone())?;

		let status = if self.dry_run {
			RunStatus::DryRun
		} else if outcome.output == original {
			RunStatus::Unchanged
		} else {
			self.store.write_text(path, &outcome.output)?;
			info!(path = %path.display(), bytes = outcome.output.len(), "wrote patched target");
			RunStatus::Written
		};

		Ok(RunReport {
			path: path.to_path_buf(),
			rules_total: pipeline.len(),
			applied: outcome.applied(),
			noops: outcome.noops(),
			skipped: outcome.skipped(),
			status,
			steps: outcome.steps,
		})
	}
}
