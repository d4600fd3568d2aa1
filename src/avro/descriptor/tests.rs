use serde_json::json;

use crate::avro::{Cardinality, DecodeError, DescriptorPool, Kind, json_name_of};

#[test]
fn json_name_follows_protoc_camel_case() {
	assert_eq!(json_name_of("display_name"), "displayName");
	assert_eq!(json_name_of("a_b_c"), "aBC");
	assert_eq!(json_name_of("already"), "already");
	assert_eq!(json_name_of("trailing_"), "trailing");
}

#[test]
fn fields_resolve_nested_and_recursive_types() {
	let pool = DescriptorPool::from_json_value(json!({
		"enums": [{ "name": "pkg.E", "values": [{ "name": "A", "number": 0 }] }],
		"messages": [
			{ "name": "pkg.Node", "fields": [
				{ "name": "next", "number": 1, "type": "message", "type_name": "pkg.Node" },
				{ "name": "tag", "number": 2, "type": "enum", "type_name": "pkg.E", "json_name": "label" },
				{ "name": "weights", "number": 3, "type": "double", "label": "map", "map_key": "uint32" }
			] }
		]
	}))
	.expect("schema builds");

	let node_idx = pool.message_index("pkg.Node").expect("node exists");
	let node = pool.message(node_idx);
	assert_eq!(node.field_by_text_name("next").map(|field| field.kind), Some(Kind::Message(node_idx)));

	let tag = node.field_by_json_name("label").expect("explicit json name is used");
	assert_eq!(tag.name.as_ref(), "tag");
	let Kind::Enum(enum_idx) = tag.kind else {
		panic!("tag should be an enum field");
	};
	assert_eq!(pool.enum_(enum_idx).value_by_name("A").map(|value| value.number), Some(0));

	let weights = node.field_by_number(3).expect("weights exists");
	assert!(weights.is_map());
	assert_eq!(weights.cardinality, Cardinality::Map { key: Kind::Uint32 });
}

#[test]
fn well_known_types_are_always_present() {
	let pool = DescriptorPool::from_json_str("{}").expect("empty schema builds");
	assert!(pool.message_by_name("google.protobuf.Timestamp").is_some());
	assert!(pool.message_by_name("google.protobuf.BytesValue").is_some());
}

#[test]
fn unknown_type_reference_is_rejected() {
	let err = DescriptorPool::from_json_value(json!({
		"messages": [{ "name": "pkg.A", "fields": [{ "name": "b", "number": 1, "type": "message", "type_name": "pkg.B" }] }]
	}))
	.expect_err("missing type fails");
	assert!(matches!(err, DecodeError::Schema { .. }));
	assert_eq!(err.to_string(), "invalid schema: pkg.A.b: unknown type pkg.B");
}

#[test]
fn duplicate_field_number_is_rejected() {
	let err = DescriptorPool::from_json_value(json!({
		"messages": [{ "name": "pkg.A", "fields": [
			{ "name": "x", "number": 1, "type": "int32" },
			{ "name": "y", "number": 1, "type": "int32" }
		] }]
	}))
	.expect_err("duplicate number fails");
	assert!(matches!(err, DecodeError::Schema { .. }));
}

#[test]
fn duplicate_type_name_is_rejected() {
	let err = DescriptorPool::from_json_value(json!({
		"messages": [{ "name": "google.protobuf.Timestamp" }]
	}))
	.expect_err("redefining a well-known type fails");
	assert!(matches!(err, DecodeError::Schema { .. }));
}

#[test]
fn float_map_key_is_rejected() {
	let err = DescriptorPool::from_json_value(json!({
		"messages": [{ "name": "pkg.A", "fields": [
			{ "name": "m", "number": 1, "type": "string", "label": "map", "map_key": "float" }
		] }]
	}))
	.expect_err("float keys fail");
	assert!(matches!(err, DecodeError::Schema { .. }));
}

#[test]
fn unknown_definition_keys_are_json_errors() {
	let err = DescriptorPool::from_json_value(json!({ "mesages": [] })).expect_err("typo fails");
	assert!(matches!(err, DecodeError::Json(_)));
}
