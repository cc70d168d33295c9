//! Endpoint addressing and credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything the wire client needs to open an authenticated session.
///
/// A session built from one set of parameters is never rebound to another;
/// the registry compares parameters on every acquire and recreates the
/// session when they differ.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
	/// Host name or IP address of the endpoint.
	pub address: String,
	pub username: String,
	pub password: String,
	/// Connect over TLS (port 16993) instead of plain HTTP (16992).
	#[serde(default)]
	pub use_tls: bool,
	/// Accept self-signed endpoint certificates.
	#[serde(default)]
	pub allow_self_signed: bool,
	/// SHA-256 fingerprint the endpoint certificate must match, hex encoded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pinned_fingerprint: Option<String>,
	/// Ask the wire layer to log raw request/response traffic.
	#[serde(default)]
	pub log_diagnostics: bool,
}

impl ConnectionParameters {
	pub fn new(address: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			username: username.into(),
			password: password.into(),
			use_tls: false,
			allow_self_signed: false,
			pinned_fingerprint: None,
			log_diagnostics: false,
		}
	}

	pub fn with_tls(mut self, use_tls: bool) -> Self {
		self.use_tls = use_tls;
		self
	}

	pub fn with_self_signed(mut self, allow: bool) -> Self {
		self.allow_self_signed = allow;
		self
	}

	pub fn with_pinned_fingerprint(mut self, fingerprint: Option<String>) -> Self {
		self.pinned_fingerprint = fingerprint;
		self
	}

	pub fn with_diagnostics(mut self, enabled: bool) -> Self {
		self.log_diagnostics = enabled;
		self
	}

	/// Default WS-Man port for the selected transport.
	pub fn port(&self) -> u16 {
		if self.use_tls { 16993 } else { 16992 }
	}

	/// WS-Man service URL derived from address and transport.
	pub fn endpoint_url(&self) -> String {
		let scheme = if self.use_tls { "https" } else { "http" };
		format!("{scheme}://{}:{}/wsman", self.address, self.port())
	}
}

impl fmt::Debug for ConnectionParameters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectionParameters")
			.field("address", &self.address)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.field("use_tls", &self.use_tls)
			.field("allow_self_signed", &self.allow_self_signed)
			.field("pinned_fingerprint", &self.pinned_fingerprint)
			.field("log_diagnostics", &self.log_diagnostics)
			.finish()
	}
}

/// Inventory record for one managed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
	/// Stable device GUID; the session registry key.
	pub guid: String,
	pub tenant_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub friendly_name: Option<String>,
	pub connection: ConnectionParameters,
}
