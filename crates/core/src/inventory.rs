//! Endpoint inventory boundary.
//!
//! Real deployments back this with their endpoint store; [`MemoryInventory`]
//! covers tests and the JSON inventory files used by the CLI.

use std::collections::HashMap;
use std::path::Path;

use amt_protocol::EndpointRecord;
use amt_runtime::BoxFut;
use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
	#[error("endpoint {guid} not found for tenant '{tenant}'")]
	NotFound { guid: String, tenant: String },

	#[error("inventory unavailable: {0}")]
	Unavailable(String),

	#[error("failed to read inventory {path}: {source}")]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid inventory {path}: {source}")]
	Parse {
		path: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Looks up the stored record for an endpoint.
pub trait Inventory: Send + Sync {
	fn lookup<'a>(&'a self, guid: &'a str, tenant: &'a str) -> BoxFut<'a, Result<EndpointRecord, InventoryError>>;
}

/// In-memory inventory keyed by GUID.
#[derive(Debug, Default)]
pub struct MemoryInventory {
	records: RwLock<HashMap<String, EndpointRecord>>,
}

impl MemoryInventory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_records(records: impl IntoIterator<Item = EndpointRecord>) -> Self {
		let inventory = Self::new();
		for record in records {
			inventory.insert(record);
		}
		inventory
	}

	/// Loads a JSON array of [`EndpointRecord`]s.
	pub fn load(path: &Path) -> Result<Self, InventoryError> {
		let display = path.display().to_string();
		let content = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
			path: display.clone(),
			source,
		})?;
		let records: Vec<EndpointRecord> =
			serde_json::from_str(&content).map_err(|source| InventoryError::Parse { path: display, source })?;
		Ok(Self::from_records(records))
	}

	/// Inserts or replaces the record for its GUID.
	pub fn insert(&self, record: EndpointRecord) -> Option<EndpointRecord> {
		self.records.write().insert(record.guid.clone(), record)
	}

	pub fn remove(&self, guid: &str) -> Option<EndpointRecord> {
		self.records.write().remove(guid)
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}
}

impl Inventory for MemoryInventory {
	fn lookup<'a>(&'a self, guid: &'a str, tenant: &'a str) -> BoxFut<'a, Result<EndpointRecord, InventoryError>> {
		let found = self
			.records
			.read()
			.get(guid)
			.filter(|record| record.tenant_id == tenant)
			.cloned();
		Box::pin(async move {
			found.ok_or_else(|| InventoryError::NotFound {
				guid: guid.to_string(),
				tenant: tenant.to_string(),
			})
		})
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use amt_protocol::ConnectionParameters;

	use super::*;

	fn record(guid: &str, tenant: &str) -> EndpointRecord {
		EndpointRecord {
			guid: guid.to_string(),
			tenant_id: tenant.to_string(),
			friendly_name: None,
			connection: ConnectionParameters::new("10.0.0.5", "admin", "pw"),
		}
	}

	#[tokio::test]
	async fn lookup_matches_tenant() {
		let inventory = MemoryInventory::from_records([record("dev-1", "acme")]);

		assert_eq!(inventory.lookup("dev-1", "acme").await.unwrap().guid, "dev-1");
		assert!(matches!(
			inventory.lookup("dev-1", "globex").await,
			Err(InventoryError::NotFound { .. })
		));
		assert!(matches!(
			inventory.lookup("dev-2", "acme").await,
			Err(InventoryError::NotFound { .. })
		));
	}

	#[tokio::test]
	async fn removed_record_is_not_found() {
		let inventory = MemoryInventory::from_records([record("dev-1", "")]);
		assert!(inventory.remove("dev-1").is_some());
		assert!(inventory.is_empty());
		assert!(inventory.lookup("dev-1", "").await.is_err());
	}

	#[test]
	fn load_reads_json_array() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"[{{"guid": "dev-1", "tenantId": "", "connection": {{"address": "10.0.0.5", "username": "admin", "password": "pw", "useTls": true}}}}]"#
		)
		.unwrap();

		let inventory = MemoryInventory::load(file.path()).unwrap();
		assert_eq!(inventory.len(), 1);
	}

	#[test]
	fn load_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "{{not json").unwrap();

		let err = MemoryInventory::load(file.path()).unwrap_err();
		assert!(matches!(err, InventoryError::Parse { .. }), "got: {err:?}");
	}
}
