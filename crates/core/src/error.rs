//! Typed failures of a dispatched call.

use amt_protocol::{Fault, ResponseTrace};
use serde::Serialize;
use thiserror::Error;

use crate::inventory::InventoryError;

pub type Result<T> = std::result::Result<T, CallError>;

/// What a dispatch hands back: a usable trace or exactly one typed error.
pub type CallResult = Result<ResponseTrace>;

#[derive(Debug, Error)]
pub enum CallError {
	/// Inventory lookup failed; no session was touched.
	#[error("endpoint lookup failed for {identity}: {source}")]
	LookupFailed {
		identity: String,
		#[source]
		source: InventoryError,
	},

	/// Call name not in the catalog; no remote call was attempted.
	#[error("unsupported operation: {0}")]
	UnsupportedOperation(String),

	#[error("invalid parameter for {call}: {reason}")]
	InvalidParameter { call: String, reason: String },

	/// The remote call reported an error.
	#[error("{call} failed: {source}")]
	OperationFailed {
		call: String,
		#[source]
		source: Fault,
	},

	/// The remote call produced neither a trace nor a fault.
	#[error("{call} returned no result")]
	NoResult { call: String },

	/// The remote call produced a trace and a fault at once.
	#[error("{call} returned both a result and an error: {fault}")]
	AmbiguousResult {
		call: String,
		fault: Fault,
		trace: ResponseTrace,
	},

	#[error("{call} timed out after {ms}ms")]
	Timeout { call: String, ms: u64 },

	/// Session could not be built for the endpoint.
	#[error(transparent)]
	Session(#[from] amt_runtime::Error),
}

/// Stable error codes for consumers that serialize failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	LookupFailed,
	UnsupportedOperation,
	InvalidParameter,
	OperationFailed,
	NoResult,
	AmbiguousResult,
	Timeout,
	SessionFailed,
}

impl CallError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			CallError::LookupFailed { .. } => ErrorKind::LookupFailed,
			CallError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
			CallError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
			CallError::OperationFailed { .. } => ErrorKind::OperationFailed,
			CallError::NoResult { .. } => ErrorKind::NoResult,
			CallError::AmbiguousResult { .. } => ErrorKind::AmbiguousResult,
			CallError::Timeout { .. } => ErrorKind::Timeout,
			CallError::Session(_) => ErrorKind::SessionFailed,
		}
	}

	/// True when the caller's input was at fault rather than the endpoint or
	/// the wire layer.
	pub fn is_client_error(&self) -> bool {
		matches!(
			self,
			CallError::LookupFailed { .. } | CallError::UnsupportedOperation(_) | CallError::InvalidParameter { .. }
		)
	}

	/// The fault reported by the endpoint, if any.
	pub fn fault(&self) -> Option<&Fault> {
		match self {
			CallError::OperationFailed { source, .. } => Some(source),
			CallError::AmbiguousResult { fault, .. } => Some(fault),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kind_serializes_as_screaming_snake() {
		let json = serde_json::to_value(ErrorKind::UnsupportedOperation).unwrap();
		assert_eq!(json, "UNSUPPORTED_OPERATION");
	}

	#[test]
	fn operation_failed_exposes_fault() {
		let fault = Fault::new("HTTP 401", "Unauthorized");
		let err = CallError::OperationFailed {
			call: "AMTGeneralSettings".to_string(),
			source: fault.clone(),
		};
		assert_eq!(err.fault(), Some(&fault));
		assert_eq!(err.kind(), ErrorKind::OperationFailed);
		assert!(!err.is_client_error());
		assert_eq!(err.to_string(), "AMTGeneralSettings failed: HTTP 401: Unauthorized");
	}

	#[test]
	fn unsupported_is_client_error() {
		let err = CallError::UnsupportedOperation("TotallyBogusCall".to_string());
		assert!(err.is_client_error());
		assert!(err.fault().is_none());
	}
}
