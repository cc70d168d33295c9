//! Results handed back by the wire client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request/response text captured for one remote call.
///
/// Both sides are opaque to the core; they are only re-indented for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTrace {
	#[serde(rename = "requestXML")]
	pub request_xml: String,
	#[serde(rename = "responseXML")]
	pub response_xml: String,
}

impl ResponseTrace {
	pub fn new(request_xml: impl Into<String>, response_xml: impl Into<String>) -> Self {
		Self {
			request_xml: request_xml.into(),
			response_xml: response_xml.into(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.request_xml.is_empty() && self.response_xml.is_empty()
	}
}

/// Error reported by the remote client: a SOAP fault, an HTTP status, or a
/// transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Fault {
	/// Short machine-readable code (e.g. `wsman:AccessDenied`, `HTTP 401`).
	pub code: String,
	pub message: String,
	/// Raw fault detail, if the endpoint sent one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}

impl Fault {
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			message: message.into(),
			detail: None,
		}
	}

	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}
}

/// Raw outcome of one remote call.
///
/// The wire layer is expected to fill exactly one side. Both sides empty, or
/// both filled, are kept as-is so the caller can report them instead of
/// guessing which one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
	pub trace: Option<ResponseTrace>,
	pub fault: Option<Fault>,
}

impl Reply {
	pub fn ok(trace: ResponseTrace) -> Self {
		Self {
			trace: Some(trace),
			fault: None,
		}
	}

	pub fn fault(fault: Fault) -> Self {
		Self {
			trace: None,
			fault: Some(fault),
		}
	}

	/// A reply carrying neither a trace nor a fault.
	pub fn empty() -> Self {
		Self::default()
	}
}

impl From<Result<ResponseTrace, Fault>> for Reply {
	fn from(result: Result<ResponseTrace, Fault>) -> Self {
		match result {
			Ok(trace) => Self::ok(trace),
			Err(fault) => Self::fault(fault),
		}
	}
}
