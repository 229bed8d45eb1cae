//! Log output for the CLI.
//!
//! The library only emits `tracing` events; the binary decides where they go.

use std::io::{self, IsTerminal};
use tracing::Level;

/// Errors encountered while configuring log output.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
	/// A global subscriber was already installed.
	#[error("failed to install log subscriber: {0}")]
	Subscriber(String),
}

/// Map the number of `-v` flags to a maximum level.
pub fn level_for(verbosity: u8) -> Level {
	match verbosity {
		0 => Level::WARN,
		1 => Level::INFO,
		2 => Level::DEBUG,
		_ => Level::TRACE,
	}
}

/// Install a stderr subscriber at the level picked by `verbosity`.
pub fn initialise(verbosity: u8) -> Result<(), TelemetryError> {
	tracing_subscriber::fmt()
		.with_max_level(level_for(verbosity))
		.with_target(false)
		.with_writer(io::stderr)
		// No colour codes when stderr is captured
		.with_ansi(io::stderr().is_terminal())
		.without_time()
		.try_init()
		.map_err(|error| TelemetryError::Subscriber(error.to_string()))
}
