//! End-to-end runs of the `amtx` binary against recorded traces.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

struct Fixture {
	dir: TempDir,
}

impl Fixture {
	fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		let inventory = json!([
			{
				"guid": "dev-1",
				"tenantId": "",
				"friendlyName": "lab bench",
				"connection": { "address": "10.0.0.5", "username": "admin", "password": "P@ssw0rd", "useTls": true }
			},
			{
				"guid": "dev-acme",
				"tenantId": "acme",
				"connection": { "address": "10.0.0.6", "username": "admin", "password": "P@ssw0rd" }
			}
		]);
		fs::write(dir.path().join("fleet.json"), inventory.to_string()).unwrap();
		fs::create_dir_all(dir.path().join("traces")).unwrap();
		fs::create_dir_all(dir.path().join("xdg")).unwrap();
		Self { dir }
	}

	fn path(&self) -> &Path {
		self.dir.path()
	}

	fn record(&self, class: &str, method: &str, request: &str, response: &str) {
		let class_dir = self.path().join("traces").join(class);
		fs::create_dir_all(&class_dir).unwrap();
		fs::write(class_dir.join(format!("{method}.request.xml")), request).unwrap();
		fs::write(class_dir.join(format!("{method}.response.xml")), response).unwrap();
	}

	fn run(&self, args: &[&str]) -> (Value, bool) {
		let output = Command::new(env!("CARGO_BIN_EXE_amtx"))
			.env("XDG_CONFIG_HOME", self.path().join("xdg"))
			.env_remove("RUST_LOG")
			.current_dir(self.path())
			.args(["-f", "json"])
			.args(args)
			.output()
			.expect("failed to execute amtx");

		let stdout = String::from_utf8_lossy(&output.stdout).to_string();
		let parsed = serde_json::from_str::<Value>(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
		(parsed, output.status.success())
	}

	fn exec(&self, guid: &str, call: &str, extra: &[&str]) -> (Value, bool) {
		let mut args = vec!["exec", guid, call, "--inventory", "fleet.json", "--replay", "traces"];
		args.extend_from_slice(extra);
		self.run(&args)
	}
}

#[test]
fn calls_lists_catalog() {
	let fixture = Fixture::new();
	let (json, ok) = fixture.run(&["calls"]);

	assert!(ok);
	assert_eq!(json["ok"], true);
	assert_eq!(json["data"]["count"], 60);
	let calls = json["data"]["calls"].as_array().unwrap();
	assert!(calls.contains(&json!("AMTGeneralSettings")));
}

#[test]
fn exec_replays_and_formats_trace() {
	let fixture = Fixture::new();
	fixture.record(
		"AMT_GeneralSettings",
		"Get",
		"\n  <Req/>",
		"<Body><HostName>bench-01</HostName></Body>",
	);

	let (json, ok) = fixture.exec("dev-1", "AMTGeneralSettings", &[]);

	assert!(ok, "unexpected failure: {json}");
	assert_eq!(json["data"]["operation"], "AMTGeneralSettings");
	assert_eq!(json["data"]["requestXML"], "<Req/>");
	assert_eq!(json["data"]["responseXML"], "<Body>\n  <HostName>bench-01</HostName>\n</Body>");
}

#[test]
fn unknown_call_is_unsupported() {
	let fixture = Fixture::new();
	let (json, ok) = fixture.exec("dev-1", "TotallyBogusCall", &[]);

	assert!(!ok);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "UNSUPPORTED_OPERATION");
}

#[test]
fn unknown_endpoint_fails_lookup() {
	let fixture = Fixture::new();
	let (json, ok) = fixture.exec("dev-404", "AMTGeneralSettings", &[]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "LOOKUP_FAILED");
}

#[test]
fn tenant_scopes_lookup() {
	let fixture = Fixture::new();
	fixture.record("CIM_Chassis", "Get", "<Req/>", "<Resp/>");

	let (json, _) = fixture.exec("dev-acme", "CIMChassis", &[]);
	assert_eq!(json["error"]["code"], "LOOKUP_FAILED");

	let (json, ok) = fixture.exec("dev-acme", "CIMChassis", &["--tenant", "acme"]);
	assert!(ok, "unexpected failure: {json}");
}

#[test]
fn missing_recording_is_operation_failure() {
	let fixture = Fixture::new();
	let (json, ok) = fixture.exec("dev-1", "CIMProcessor", &[]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "OPERATION_FAILED");
	assert_eq!(json["error"]["details"]["code"], "replay:NotRecorded");
}

#[test]
fn invoke_uses_class_namespace() {
	let fixture = Fixture::new();
	fixture.record("AMT_MessageLog", "PositionToFirstRecord", "<Req/>", "<Resp/>");

	let (json, ok) = fixture.run(&[
		"invoke",
		"dev-1",
		"AMT_MessageLog",
		"PositionToFirstRecord",
		"--inventory",
		"fleet.json",
		"--replay",
		"traces",
	]);

	assert!(ok, "unexpected failure: {json}");
	assert_eq!(json["data"]["operation"], "AMT_MessageLog.PositionToFirstRecord");
}

#[test]
fn bad_record_index_is_invalid_input() {
	let fixture = Fixture::new();
	let (json, ok) = fixture.exec("dev-1", "AMTAuditLog", &["--param", "latest"]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[test]
fn malformed_config_is_reported() {
	let fixture = Fixture::new();
	let config_dir = fixture.path().join("xdg").join("amtx");
	fs::create_dir_all(&config_dir).unwrap();
	fs::write(config_dir.join("config.json"), "not json").unwrap();

	let (json, ok) = fixture.exec("dev-1", "AMTGeneralSettings", &[]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "CONFIG_ERROR");
}
