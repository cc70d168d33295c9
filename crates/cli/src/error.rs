use std::path::PathBuf;

use amt::{CallError, ErrorKind, InventoryError};
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read config {path}: {source}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid config {path}: {source}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("replay directory not found: {0}")]
	ReplayDir(PathBuf),

	#[error("unknown resource class: {0}")]
	UnknownClass(String),

	#[error(transparent)]
	Inventory(#[from] InventoryError),

	#[error(transparent)]
	Call(#[from] CallError),
}

fn call_error_code(kind: ErrorKind) -> ErrorCode {
	match kind {
		ErrorKind::LookupFailed => ErrorCode::LookupFailed,
		ErrorKind::UnsupportedOperation => ErrorCode::UnsupportedOperation,
		ErrorKind::InvalidParameter => ErrorCode::InvalidInput,
		ErrorKind::OperationFailed => ErrorCode::OperationFailed,
		ErrorKind::NoResult => ErrorCode::NoResult,
		ErrorKind::AmbiguousResult => ErrorCode::AmbiguousResult,
		ErrorKind::Timeout => ErrorCode::Timeout,
		ErrorKind::SessionFailed => ErrorCode::SessionError,
	}
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::ConfigRead { path, .. } | CliError::ConfigParse { path, .. } => {
				(ErrorCode::ConfigError, Some(serde_json::json!({ "path": path })))
			}
			CliError::ReplayDir(path) => (ErrorCode::InvalidInput, Some(serde_json::json!({ "path": path }))),
			CliError::UnknownClass(class) => (
				ErrorCode::UnsupportedOperation,
				Some(serde_json::json!({ "class": class })),
			),
			CliError::Inventory(_) => (ErrorCode::ConfigError, None),
			CliError::Call(err) => {
				let details = err.fault().map(|fault| serde_json::json!(fault));
				(call_error_code(err.kind()), details)
			}
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}
