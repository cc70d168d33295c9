use serde::Serialize;

use super::*;

#[derive(Serialize)]
struct Listing {
	calls: Vec<&'static str>,
}

impl TextRender for Listing {}

#[test]
fn result_builder_success() {
	let result = ResultBuilder::new("calls")
		.data(Listing {
			calls: vec!["AMTGeneralSettings"],
		})
		.timings(Duration::from_millis(3))
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "calls");
	assert!(result.error.is_none());
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
}

#[test]
fn result_builder_error() {
	let result: CommandResult<()> = ResultBuilder::new("exec")
		.error(CommandError {
			code: ErrorCode::LookupFailed,
			message: "endpoint dev-9 not found".into(),
			details: None,
		})
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::LookupFailed);
}

#[test]
fn envelope_uses_camel_case() {
	let result = ResultBuilder::new("calls")
		.data(Listing { calls: vec![] })
		.timings(Duration::from_millis(12))
		.build();
	let json = serde_json::to_value(&result).unwrap();

	assert_eq!(json["schemaVersion"], 1);
	assert_eq!(json["timings"]["durationMs"], 12);
	assert!(json.get("error").is_none());
}

#[test]
fn error_code_display_matches_serde() {
	for code in [ErrorCode::UnsupportedOperation, ErrorCode::AmbiguousResult, ErrorCode::ConfigError] {
		let json = serde_json::to_value(code).unwrap();
		assert_eq!(json, code.to_string());
	}
}

#[test]
fn output_format_value_names() {
	use clap::ValueEnum;

	let names: Vec<_> = OutputFormat::value_variants()
		.iter()
		.filter_map(|format| format.to_possible_value())
		.map(|value| value.get_name().to_string())
		.collect();
	assert_eq!(names, ["text", "json", "ndjson"]);
	assert_eq!(OutputFormat::from_str("NDJSON", true), Ok(OutputFormat::Ndjson));
	assert!(OutputFormat::from_str("toon", true).is_err());
}

#[test]
fn text_output_defaults_to_pretty_json() {
	let result = ResultBuilder::new("calls")
		.data(Listing {
			calls: vec!["CIMChassis"],
		})
		.build();
	let mut buf = Vec::new();
	write_text(&result, &mut buf).unwrap();

	let text = String::from_utf8(buf).unwrap();
	assert!(text.contains("\"CIMChassis\""));
}

#[test]
fn text_output_reports_error() {
	let result: CommandResult<()> = ResultBuilder::new("exec")
		.error(CommandError {
			code: ErrorCode::Timeout,
			message: "AMTGeneralSettings timed out after 20ms".into(),
			details: None,
		})
		.build();
	let mut buf = Vec::new();
	write_text(&result, &mut buf).unwrap();

	assert_eq!(
		String::from_utf8(buf).unwrap(),
		"Error [TIMEOUT]: AMTGeneralSettings timed out after 20ms\n"
	);
}
