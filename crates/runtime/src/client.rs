//! Capability traits implemented by the wire layer.
//!
//! A [`RemoteClient`] is one authenticated session against one endpoint. It is
//! not assumed to be safe for concurrent use, so every verb takes `&mut self`
//! and the registry serializes callers behind a per-session lock.

use std::future::Future;
use std::pin::Pin;

use amt_protocol::{ConnectionParameters, Reply, ResourceClass};

use crate::error::Result;

/// Boxing alias: object-safe async verbs without `async_trait`.
pub type BoxFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read verbs exposed by one endpoint session.
///
/// Every verb resolves to a [`Reply`]; transport problems are reported as a
/// fault inside the reply rather than as a separate error channel.
pub trait RemoteClient: Send {
	/// `Get` on a class, optionally narrowed by an instance selector.
	fn get<'a>(&'a mut self, class: ResourceClass, selector: Option<&'a str>) -> BoxFut<'a, Reply>;

	/// `Enumerate` on a class; the response carries an enumeration context.
	fn enumerate(&mut self, class: ResourceClass) -> BoxFut<'_, Reply>;

	/// `Pull` items from an enumeration context.
	fn pull<'a>(&'a mut self, class: ResourceClass, context: &'a str) -> BoxFut<'a, Reply>;

	/// Read log records starting at `start_index` (audit and message logs).
	fn read_records(&mut self, class: ResourceClass, start_index: u32) -> BoxFut<'_, Reply>;

	/// Move the message log cursor to its first record.
	fn position_to_first_record(&mut self) -> BoxFut<'_, Reply>;

	/// List user ACL entries from the authorization service.
	fn enumerate_user_acl_entries(&mut self, start_index: u32) -> BoxFut<'_, Reply>;

	/// Fetch the admin ACL entry from the authorization service.
	fn get_admin_acl_entry(&mut self) -> BoxFut<'_, Reply>;

	/// Release the underlying connection. Called once when the session is
	/// destroyed or evicted.
	fn close(&mut self) -> BoxFut<'_, Result<()>> {
		Box::pin(async { Ok(()) })
	}
}

/// Builds remote clients from connection parameters.
///
/// Construction is expected to be cheap and local: the wire layer connects
/// lazily on the first verb.
pub trait ClientFactory: Send + Sync {
	fn create(&self, identity: &str, params: &ConnectionParameters) -> Result<Box<dyn RemoteClient>>;
}
