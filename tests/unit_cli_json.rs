#![allow(missing_docs)]

use std::process::{Command, Output};

use protoavro_testkit::fixture_path;
use serde_json::Value;

#[test]
fn decode_json_output_is_valid_and_structured() {
	let json = run_json(&[
		"decode",
		&fixture_path("shipment_schema.json").display().to_string(),
		&fixture_path("shipment.json").display().to_string(),
		"--message",
		"example.v1.Shipment",
		"--extra-field",
		"ingest_time",
		"--json",
	]);

	assert_eq!(json["message"], "example.v1.Shipment");
	assert_eq!(json["fields"], 9);
	assert_eq!(json["value"]["shipmentId"], "s-1042");
	assert_eq!(json["value"]["status"], "IN_TRANSIT");
	assert_eq!(json["value"]["createTime"]["seconds"], 1_700_000_000_i64);
	assert!(json["value"]["lineItems"].as_array().is_some_and(|items| items.len() == 3), "expected three line items");
}

#[test]
fn decode_text_output_lists_fields() {
	let output = run_protoavro(&[
		"decode",
		&fixture_path("shipment_schema.json").display().to_string(),
		&fixture_path("shipment_union.json").display().to_string(),
		"--message",
		"example.v1.Shipment",
	]);
	assert!(output.status.success(), "command should succeed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("fields: 2"), "unexpected output: {stdout}");
	assert!(stdout.contains("shipment_id = \"s-1042\""), "unexpected output: {stdout}");
}

#[test]
fn decode_failure_exits_nonzero_with_error() {
	let output = run_protoavro(&[
		"decode",
		&fixture_path("shipment_schema.json").display().to_string(),
		&fixture_path("shipment_unknown_field.json").display().to_string(),
		"--message",
		"example.v1.Shipment",
	]);

	assert!(!output.status.success(), "command should fail");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error: unexpected field warehouse"), "unexpected stderr: {stderr}");
}

#[test]
fn max_depth_flag_limits_union_unwrap() {
	let output = run_protoavro(&[
		"decode",
		&fixture_path("shipment_schema.json").display().to_string(),
		&fixture_path("shipment_union.json").display().to_string(),
		"--message",
		"example.v1.Shipment",
		"--max-depth",
		"1",
	]);

	assert!(!output.status.success(), "command should fail");
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("error: decode depth exceeded (max=1)"), "unexpected stderr: {stderr}");
}

#[test]
fn schema_command_prints_message_fields() {
	let output = run_protoavro(&[
		"schema",
		&fixture_path("shipment_schema.json").display().to_string(),
		"--message",
		"example.v1.Shipment",
	]);
	assert!(output.status.success(), "command should succeed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("field_count: 9"), "unexpected output: {stdout}");
	assert!(stdout.contains("repeated example.v1.LineItem line_items = 3"), "unexpected output: {stdout}");
	assert!(stdout.contains("map<string, string> annotations = 4"), "unexpected output: {stdout}");
}

fn run_protoavro(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_protoavro")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run_protoavro(args);
	assert!(
		output.status.success(),
		"protoavro command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
