//! Structured output envelope for all CLI commands.
//!
//! Every command produces one result envelope on stdout:
//!
//! ```json
//! {
//!   "ok": true,
//!   "command": "exec",
//!   "data": { ... },
//!   "timings": { "durationMs": 12 }
//! }
//! ```
//!
//! On failure `data` is replaced by `error: { code, message, details }`.

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// Pretty-printed JSON
	Json,
	/// Single-line JSON
	Ndjson,
}

/// Human rendering for command data in [`OutputFormat::Text`].
///
/// Defaults to pretty JSON.
pub trait TextRender: Serialize {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
		writeln!(out, "{json}")
	}
}

impl TextRender for () {
	fn render_text(&self, _out: &mut dyn Write) -> io::Result<()> {
		Ok(())
	}
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	/// Command name (e.g. "calls", "exec")
	pub command: String,

	/// Command-specific result data (only present on success)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	/// Error information (only present on failure)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	pub message: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Endpoint not in the inventory
	LookupFailed,
	/// Call or class/method not in the catalog
	UnsupportedOperation,
	/// The endpoint reported a fault
	OperationFailed,
	/// The endpoint returned nothing
	NoResult,
	/// The endpoint returned a trace and a fault
	AmbiguousResult,
	Timeout,
	/// Session could not be built
	SessionError,
	/// Invalid input provided
	InvalidInput,
	/// Config or inventory file unreadable or malformed
	ConfigError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let code = match self {
			ErrorCode::LookupFailed => "LOOKUP_FAILED",
			ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
			ErrorCode::OperationFailed => "OPERATION_FAILED",
			ErrorCode::NoResult => "NO_RESULT",
			ErrorCode::AmbiguousResult => "AMBIGUOUS_RESULT",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::SessionError => "SESSION_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::ConfigError => "CONFIG_ERROR",
		};
		f.write_str(code)
	}
}

/// Timing information for the command.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// Builder for [`CommandResult`].
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	timings: Option<Timings>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			timings: None,
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn timings(mut self, timings: impl Into<Timings>) -> Self {
		self.timings = Some(timings.into());
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok: self.error.is_none(),
			command: self.command,
			data: self.data,
			error: self.error,
			timings: self.timings,
		}
	}
}

/// Print a command result to stdout in the specified format.
pub fn print_result<T: TextRender>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			let mut stdout = io::stdout().lock();
			let _ = write_text(result, &mut stdout);
		}
	}
}

fn write_text<T: TextRender>(result: &CommandResult<T>, out: &mut dyn Write) -> io::Result<()> {
	if let Some(ref data) = result.data {
		data.render_text(out)?;
	}
	if let Some(ref error) = result.error {
		writeln!(out, "Error [{}]: {}", error.code, error.message)?;
	}
	Ok(())
}

/// Print an error to stderr in human-readable format.
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "error".red().bold(), error.code, error.message);
	if let Some(detail) = error.details.as_ref().and_then(|d| d.get("detail")).and_then(|d| d.as_str()) {
		eprintln!("{detail}");
	}
}

/// Writes a section heading in text output.
pub fn heading(out: &mut dyn Write, title: &str) -> io::Result<()> {
	writeln!(out, "{}", title.green().bold())
}
