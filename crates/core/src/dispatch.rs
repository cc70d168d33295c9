//! Operation dispatcher: call name in, normalized trace or typed error out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use amt_protocol::EndpointRecord;
use amt_runtime::{ClientFactory, SessionRegistry};
use tracing::{debug, warn};

use crate::catalog::{Catalog, OperationDescriptor};
use crate::config::ExplorerConfig;
use crate::error::{CallError, CallResult};
use crate::inventory::Inventory;
use crate::normalize;

/// Executes catalog operations against inventoried endpoints.
///
/// Holds the session registry, so one dispatcher should be shared by every
/// request task; sessions are reused across calls to the same endpoint.
pub struct Dispatcher {
	registry: SessionRegistry,
	catalog: &'static Catalog,
	inventory: Arc<dyn Inventory>,
	call_timeout: Option<Duration>,
}

impl Dispatcher {
	pub fn new(factory: Arc<dyn ClientFactory>, inventory: Arc<dyn Inventory>, config: &ExplorerConfig) -> Self {
		let registry = SessionRegistry::new(factory, config.registry_config());
		Self::with_registry(registry, inventory, config)
	}

	/// Builds a dispatcher over an existing registry.
	pub fn with_registry(registry: SessionRegistry, inventory: Arc<dyn Inventory>, config: &ExplorerConfig) -> Self {
		Self {
			registry,
			catalog: Catalog::builtin(),
			inventory,
			call_timeout: config.call_timeout(),
		}
	}

	pub fn registry(&self) -> &SessionRegistry {
		&self.registry
	}

	pub fn catalog(&self) -> &'static Catalog {
		self.catalog
	}

	/// Logical call names accepted by [`Dispatcher::execute_call`], in table
	/// order.
	pub fn list_supported_calls(&self) -> Vec<&'static str> {
		self.catalog.call_names().to_vec()
	}

	/// See [`Catalog::describe`].
	pub fn describe(&self, class_name: &str) -> Vec<&'static OperationDescriptor> {
		self.catalog.describe(class_name)
	}

	/// Runs the operation registered under `call_name` against `identity`.
	///
	/// An empty `param` is treated as absent. Unknown call names fail before
	/// any session is created or refreshed.
	pub async fn execute_call(&self, identity: &str, tenant: &str, call_name: &str, param: Option<&str>) -> CallResult {
		let record = self.lookup(identity, tenant).await?;
		let op = self
			.catalog
			.resolve_call(call_name)
			.ok_or_else(|| CallError::UnsupportedOperation(call_name.to_string()))?;
		self.run(identity, &record, call_name, op, param).await
	}

	/// Runs `class_name`.`method_name` against `identity`.
	pub async fn execute_class_call(
		&self,
		identity: &str,
		tenant: &str,
		class_name: &str,
		method_name: &str,
		param: Option<&str>,
	) -> CallResult {
		let record = self.lookup(identity, tenant).await?;
		let op = self
			.catalog
			.resolve(class_name, method_name)
			.ok_or_else(|| CallError::UnsupportedOperation(format!("{class_name}.{method_name}")))?;
		let call = op.name();
		self.run(identity, &record, &call, op, param).await
	}

	/// Drops the cached session for `identity`, if any.
	pub async fn destroy(&self, identity: &str) -> bool {
		self.registry.destroy(identity).await
	}

	pub async fn shutdown(&self) {
		self.registry.shutdown().await;
	}

	async fn lookup(&self, identity: &str, tenant: &str) -> Result<EndpointRecord, CallError> {
		self.inventory
			.lookup(identity, tenant)
			.await
			.map_err(|source| CallError::LookupFailed {
				identity: identity.to_string(),
				source,
			})
	}

	async fn run(
		&self,
		identity: &str,
		record: &EndpointRecord,
		call: &str,
		op: &OperationDescriptor,
		param: Option<&str>,
	) -> CallResult {
		let param = param.filter(|p| !p.is_empty());
		let session = self.registry.acquire(identity, &record.connection)?;
		let started = Instant::now();

		let reply = {
			let mut client = session.lock().await;
			let pending = op
				.invoke(&mut **client, param)
				.map_err(|err| CallError::InvalidParameter {
					call: call.to_string(),
					reason: err.0,
				})?;
			match self.call_timeout {
				Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
					warn!(
						target = "amt.dispatch",
						identity,
						call,
						timeout_ms = limit.as_millis() as u64,
						"remote call timed out"
					);
					CallError::Timeout {
						call: call.to_string(),
						ms: limit.as_millis() as u64,
					}
				})?,
				None => pending.await,
			}
		};

		debug!(
			target = "amt.dispatch",
			identity,
			call,
			operation = %op.name(),
			session_id = session.session_id(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			faulted = reply.fault.is_some(),
			"remote call finished"
		);
		normalize::classify(call, reply)
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("registry", &self.registry)
			.field("call_timeout", &self.call_timeout)
			.finish_non_exhaustive()
	}
}
