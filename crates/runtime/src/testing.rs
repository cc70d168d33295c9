//! Stub wire layer for tests.
//!
//! [`StubFactory`] hands out [`StubClient`]s that answer every verb with a
//! canned trace unless told otherwise, and counts creations and teardowns per
//! identity so tests can observe session reuse.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use amt_protocol::{ConnectionParameters, Fault, Method, Reply, ResourceClass, ResponseTrace};
use parking_lot::Mutex;

use crate::client::{BoxFut, ClientFactory, RemoteClient};
use crate::error::{Error, Result};

/// One verb invocation observed by a stub client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
	pub identity: String,
	pub class: ResourceClass,
	pub method: Method,
	pub param: Option<String>,
}

#[derive(Default)]
struct StubState {
	default_trace: Option<ResponseTrace>,
	replies: HashMap<(ResourceClass, Method), Reply>,
	delay: Option<Duration>,
	construction_failure: Option<String>,
	teardown_failure: Option<String>,
	created: HashMap<String, usize>,
	closed: HashMap<String, usize>,
	calls: Vec<StubCall>,
}

/// Factory producing [`StubClient`]s that share one configuration.
#[derive(Clone, Default)]
pub struct StubFactory {
	state: Arc<Mutex<StubState>>,
}

impl StubFactory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Trace returned by every verb without a specific reply.
	/// Defaults to `<Req/>` / `<Resp/>`.
	pub fn with_trace(self, trace: ResponseTrace) -> Self {
		self.state.lock().default_trace = Some(trace);
		self
	}

	/// Answer `class`/`method` with `fault`.
	pub fn fail(self, class: ResourceClass, method: Method, fault: Fault) -> Self {
		self.reply(class, method, Reply::fault(fault))
	}

	/// Answer `class`/`method` with an arbitrary reply.
	pub fn reply(self, class: ResourceClass, method: Method, reply: Reply) -> Self {
		self.state.lock().replies.insert((class, method), reply);
		self
	}

	/// Sleep before answering any verb.
	pub fn with_delay(self, delay: Duration) -> Self {
		self.state.lock().delay = Some(delay);
		self
	}

	/// Make every `create` fail with `reason`.
	pub fn fail_construction(self, reason: impl Into<String>) -> Self {
		self.state.lock().construction_failure = Some(reason.into());
		self
	}

	/// Make every `close` fail with `reason`.
	pub fn fail_teardown(self, reason: impl Into<String>) -> Self {
		self.state.lock().teardown_failure = Some(reason.into());
		self
	}

	/// Number of clients created for `identity`.
	pub fn created(&self, identity: &str) -> usize {
		self.state.lock().created.get(identity).copied().unwrap_or(0)
	}

	pub fn total_created(&self) -> usize {
		self.state.lock().created.values().sum()
	}

	/// Number of clients closed for `identity`.
	pub fn closed(&self, identity: &str) -> usize {
		self.state.lock().closed.get(identity).copied().unwrap_or(0)
	}

	/// Every verb invocation so far, in order.
	pub fn calls(&self) -> Vec<StubCall> {
		self.state.lock().calls.clone()
	}
}

impl ClientFactory for StubFactory {
	fn create(&self, identity: &str, _params: &ConnectionParameters) -> Result<Box<dyn RemoteClient>> {
		let mut state = self.state.lock();
		if let Some(reason) = &state.construction_failure {
			return Err(Error::ClientConstruction {
				identity: identity.to_string(),
				reason: reason.clone(),
			});
		}
		*state.created.entry(identity.to_string()).or_default() += 1;
		Ok(Box::new(StubClient {
			identity: identity.to_string(),
			state: self.state.clone(),
		}))
	}
}

/// Client answering from the shared [`StubFactory`] configuration.
pub struct StubClient {
	identity: String,
	state: Arc<Mutex<StubState>>,
}

impl StubClient {
	fn respond(&mut self, class: ResourceClass, method: Method, param: Option<String>) -> BoxFut<'_, Reply> {
		let delay = {
			let mut state = self.state.lock();
			state.calls.push(StubCall {
				identity: self.identity.clone(),
				class,
				method,
				param,
			});
			state.delay
		};
		Box::pin(async move {
			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}
			let state = self.state.lock();
			state.replies.get(&(class, method)).cloned().unwrap_or_else(|| {
				Reply::ok(
					state
						.default_trace
						.clone()
						.unwrap_or_else(|| ResponseTrace::new("<Req/>", "<Resp/>")),
				)
			})
		})
	}
}

impl RemoteClient for StubClient {
	fn get<'a>(&'a mut self, class: ResourceClass, selector: Option<&'a str>) -> BoxFut<'a, Reply> {
		self.respond(class, Method::Get, selector.map(str::to_string))
	}

	fn enumerate(&mut self, class: ResourceClass) -> BoxFut<'_, Reply> {
		self.respond(class, Method::Enumerate, None)
	}

	fn pull<'a>(&'a mut self, class: ResourceClass, context: &'a str) -> BoxFut<'a, Reply> {
		self.respond(class, Method::Pull, Some(context.to_string()))
	}

	fn read_records(&mut self, class: ResourceClass, start_index: u32) -> BoxFut<'_, Reply> {
		let method = if class == ResourceClass::AmtMessageLog {
			Method::GetRecords
		} else {
			Method::ReadRecords
		};
		self.respond(class, method, Some(start_index.to_string()))
	}

	fn position_to_first_record(&mut self) -> BoxFut<'_, Reply> {
		self.respond(ResourceClass::AmtMessageLog, Method::PositionToFirstRecord, None)
	}

	fn enumerate_user_acl_entries(&mut self, start_index: u32) -> BoxFut<'_, Reply> {
		self.respond(
			ResourceClass::AmtAuthorizationService,
			Method::EnumerateUserAclEntries,
			Some(start_index.to_string()),
		)
	}

	fn get_admin_acl_entry(&mut self) -> BoxFut<'_, Reply> {
		self.respond(ResourceClass::AmtAuthorizationService, Method::GetAdminAclEntry, None)
	}

	fn close(&mut self) -> BoxFut<'_, Result<()>> {
		Box::pin(async move {
			let mut state = self.state.lock();
			*state.closed.entry(self.identity.clone()).or_default() += 1;
			match &state.teardown_failure {
				Some(reason) => Err(Error::Teardown {
					identity: self.identity.clone(),
					reason: reason.clone(),
				}),
				None => Ok(()),
			}
		})
	}
}
