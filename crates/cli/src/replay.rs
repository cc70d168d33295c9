//! Trace-replay wire client.
//!
//! Serves recorded traces from a directory instead of talking to an endpoint:
//!
//! ```text
//! <root>/<ClassName>/<Method>.request.xml
//! <root>/<ClassName>/<Method>.response.xml
//! <root>/<ClassName>/<Method>.fault.json     (optional, a serialized Fault)
//! ```
//!
//! A recording under `<root>/<identity>/<ClassName>/` takes precedence, so one
//! directory can hold a shared baseline plus per-endpoint overrides.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use amt::{ConnectionParameters, Fault, Method, Reply, ResourceClass, ResponseTrace};
use amt_runtime::{BoxFut, ClientFactory, Error as RuntimeError, RemoteClient, Result as RuntimeResult};
use tracing::debug;

/// Builds [`ReplayClient`]s rooted at one recording directory.
#[derive(Debug, Clone)]
pub struct ReplayFactory {
	root: PathBuf,
}

impl ReplayFactory {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl ClientFactory for ReplayFactory {
	fn create(&self, identity: &str, params: &ConnectionParameters) -> RuntimeResult<Box<dyn RemoteClient>> {
		if !self.root.is_dir() {
			return Err(RuntimeError::ClientConstruction {
				identity: identity.to_string(),
				reason: format!("replay directory {} does not exist", self.root.display()),
			});
		}
		debug!(
			target = "amt.cli",
			identity,
			endpoint = %params.endpoint_url(),
			root = %self.root.display(),
			"replaying recorded traces"
		);
		Ok(Box::new(ReplayClient {
			identity: identity.to_string(),
			root: self.root.clone(),
		}))
	}
}

/// Answers every verb from files on disk.
#[derive(Debug)]
pub struct ReplayClient {
	identity: String,
	root: PathBuf,
}

impl ReplayClient {
	fn class_dir(&self, class: ResourceClass) -> PathBuf {
		let specific = self.root.join(&self.identity).join(class.class_name());
		if specific.is_dir() {
			specific
		} else {
			self.root.join(class.class_name())
		}
	}

	fn replay(&self, class: ResourceClass, method: Method) -> BoxFut<'static, Reply> {
		let dir = self.class_dir(class);
		Box::pin(async move { load_recording(&dir, class, method).await })
	}
}

async fn load_recording(dir: &Path, class: ResourceClass, method: Method) -> Reply {
	let stem = method.as_str();

	let fault = match tokio::fs::read_to_string(dir.join(format!("{stem}.fault.json"))).await {
		Ok(raw) => Some(serde_json::from_str::<Fault>(&raw).unwrap_or_else(|err| {
			Fault::new("replay:InvalidFault", format!("unreadable fault recording: {err}"))
		})),
		Err(err) if err.kind() == ErrorKind::NotFound => None,
		Err(err) => return Reply::fault(read_fault(class, method, &err)),
	};

	let request = read_optional(&dir.join(format!("{stem}.request.xml"))).await;
	let response = read_optional(&dir.join(format!("{stem}.response.xml"))).await;

	let trace = match (request, response) {
		(Ok(None), Ok(None)) => None,
		(Ok(request), Ok(response)) => Some(ResponseTrace::new(
			request.unwrap_or_default(),
			response.unwrap_or_default(),
		)),
		(Err(err), _) | (_, Err(err)) => return Reply::fault(read_fault(class, method, &err)),
	};

	match (trace, fault) {
		(None, None) => Reply::fault(Fault::new(
			"replay:NotRecorded",
			format!("no recording for {}.{}", class.class_name(), method.as_str()),
		)),
		(trace, fault) => Reply { trace, fault },
	}
}

async fn read_optional(path: &Path) -> std::io::Result<Option<String>> {
	match tokio::fs::read_to_string(path).await {
		Ok(content) => Ok(Some(content)),
		Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
		Err(err) => Err(err),
	}
}

fn read_fault(class: ResourceClass, method: Method, err: &std::io::Error) -> Fault {
	Fault::new(
		"replay:ReadError",
		format!("failed to read recording for {}.{}: {err}", class.class_name(), method.as_str()),
	)
}

impl RemoteClient for ReplayClient {
	fn get<'a>(&'a mut self, class: ResourceClass, _selector: Option<&'a str>) -> BoxFut<'a, Reply> {
		self.replay(class, Method::Get)
	}

	fn enumerate(&mut self, class: ResourceClass) -> BoxFut<'_, Reply> {
		self.replay(class, Method::Enumerate)
	}

	fn pull<'a>(&'a mut self, class: ResourceClass, _context: &'a str) -> BoxFut<'a, Reply> {
		self.replay(class, Method::Pull)
	}

	fn read_records(&mut self, class: ResourceClass, _start_index: u32) -> BoxFut<'_, Reply> {
		let method = if class == ResourceClass::AmtMessageLog {
			Method::GetRecords
		} else {
			Method::ReadRecords
		};
		self.replay(class, method)
	}

	fn position_to_first_record(&mut self) -> BoxFut<'_, Reply> {
		self.replay(ResourceClass::AmtMessageLog, Method::PositionToFirstRecord)
	}

	fn enumerate_user_acl_entries(&mut self, _start_index: u32) -> BoxFut<'_, Reply> {
		self.replay(ResourceClass::AmtAuthorizationService, Method::EnumerateUserAclEntries)
	}

	fn get_admin_acl_entry(&mut self) -> BoxFut<'_, Reply> {
		self.replay(ResourceClass::AmtAuthorizationService, Method::GetAdminAclEntry)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	fn record(root: &Path, class: &str, method: &str, request: &str, response: &str) {
		let dir = root.join(class);
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join(format!("{method}.request.xml")), request).unwrap();
		fs::write(dir.join(format!("{method}.response.xml")), response).unwrap();
	}

	fn client(root: &Path, identity: &str) -> Box<dyn RemoteClient> {
		ReplayFactory::new(root)
			.create(identity, &ConnectionParameters::new("10.0.0.5", "admin", "pw"))
			.unwrap()
	}

	#[tokio::test]
	async fn serves_recorded_trace() {
		let dir = tempfile::tempdir().unwrap();
		record(dir.path(), "AMT_GeneralSettings", "Get", "<Req/>", "<Resp/>");

		let reply = client(dir.path(), "dev-1").get(ResourceClass::AmtGeneralSettings, None).await;
		assert_eq!(reply, Reply::ok(ResponseTrace::new("<Req/>", "<Resp/>")));
	}

	#[tokio::test]
	async fn missing_recording_is_a_fault() {
		let dir = tempfile::tempdir().unwrap();

		let reply = client(dir.path(), "dev-1").enumerate(ResourceClass::CimProcessor).await;
		assert!(reply.trace.is_none());
		assert_eq!(reply.fault.unwrap().code, "replay:NotRecorded");
	}

	#[tokio::test]
	async fn recorded_fault_is_replayed() {
		let dir = tempfile::tempdir().unwrap();
		let class_dir = dir.path().join("AMT_AuditLog");
		fs::create_dir_all(&class_dir).unwrap();
		fs::write(
			class_dir.join("ReadRecords.fault.json"),
			r#"{"code": "wsman:AccessDenied", "message": "denied"}"#,
		)
		.unwrap();

		let reply = client(dir.path(), "dev-1").read_records(ResourceClass::AmtAuditLog, 1).await;
		assert_eq!(reply, Reply::fault(Fault::new("wsman:AccessDenied", "denied")));
	}

	#[tokio::test]
	async fn identity_recording_overrides_baseline() {
		let dir = tempfile::tempdir().unwrap();
		record(dir.path(), "CIM_Chassis", "Get", "<Req/>", "<Baseline/>");
		record(&dir.path().join("dev-2"), "CIM_Chassis", "Get", "<Req/>", "<Override/>");

		let baseline = client(dir.path(), "dev-1").get(ResourceClass::CimChassis, None).await;
		let specific = client(dir.path(), "dev-2").get(ResourceClass::CimChassis, None).await;
		assert_eq!(baseline.trace.unwrap().response_xml, "<Baseline/>");
		assert_eq!(specific.trace.unwrap().response_xml, "<Override/>");
	}

	#[tokio::test]
	async fn message_log_reads_get_records() {
		let dir = tempfile::tempdir().unwrap();
		record(dir.path(), "AMT_MessageLog", "GetRecords", "<Req/>", "<Records/>");

		let reply = client(dir.path(), "dev-1").read_records(ResourceClass::AmtMessageLog, 1).await;
		assert_eq!(reply.trace.unwrap().response_xml, "<Records/>");
	}

	#[test]
	fn missing_root_fails_construction() {
		let dir = tempfile::tempdir().unwrap();
		let factory = ReplayFactory::new(dir.path().join("nope"));
		let err = factory
			.create("dev-1", &ConnectionParameters::new("10.0.0.5", "admin", "pw"))
			.err()
			.unwrap();
		assert!(matches!(err, RuntimeError::ClientConstruction { .. }));
	}
}
