//! Error types for the session runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or tearing down sessions.
#[derive(Debug, Error)]
pub enum Error {
	/// Connection parameters are unusable (empty address, missing user).
	#[error("Invalid connection parameters for {identity}: {reason}")]
	InvalidParameters { identity: String, reason: String },

	/// The wire layer refused to build a client.
	#[error("Failed to construct remote client for {identity}: {reason}")]
	ClientConstruction { identity: String, reason: String },

	/// The wire layer failed to release a client.
	#[error("Teardown failed for {identity}: {reason}")]
	Teardown { identity: String, reason: String },
}

impl Error {
	/// Identity of the endpoint the error concerns.
	pub fn identity(&self) -> &str {
		match self {
			Error::InvalidParameters { identity, .. }
			| Error::ClientConstruction { identity, .. }
			| Error::Teardown { identity, .. } => identity,
		}
	}
}
