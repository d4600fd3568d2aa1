//! Decoding of `google.protobuf` well-known types.
//!
//! These messages have fixed Avro encodings instead of the generic record mapping.

use std::collections::BTreeMap;

use crate::avro::coerce::{decode_int_like, single_entry};
use crate::avro::decode::DecodeCtx;
use crate::avro::descriptor::{FieldDef, KindDef, MessageDef};
use crate::avro::scalar::decode_scalar;
use crate::avro::{DecodeError, Datum, FieldMap, MessageDescriptor, Result, Value};

/// `google.protobuf.Timestamp`.
pub const TIMESTAMP: &str = "google.protobuf.Timestamp";
/// `google.protobuf.Duration`.
pub const DURATION: &str = "google.protobuf.Duration";

const TIMESTAMP_MICROS: &str = "long.timestamp-micros";
const MICROS_PER_SECOND: i64 = 1_000_000;
const NANOS_PER_MICRO: i64 = 1_000;

/// Wrapper message name, Avro branch name, and wrapped kind.
const WRAPPERS: &[(&str, &str, KindDef)] = &[
	("google.protobuf.DoubleValue", "double", KindDef::Double),
	("google.protobuf.FloatValue", "float", KindDef::Float),
	("google.protobuf.Int64Value", "long", KindDef::Int64),
	("google.protobuf.UInt64Value", "long", KindDef::Uint64),
	("google.protobuf.Int32Value", "int", KindDef::Int32),
	("google.protobuf.UInt32Value", "int", KindDef::Uint32),
	("google.protobuf.BoolValue", "boolean", KindDef::Bool),
	("google.protobuf.StringValue", "string", KindDef::String),
	("google.protobuf.BytesValue", "bytes", KindDef::Bytes),
];

/// Decoder for messages with a fixed, non-generic Avro encoding.
pub trait WellKnownDecoder {
	/// Whether `full_name` is handled by this decoder.
	fn is_well_known(&self, full_name: &str) -> bool;

	/// Decode a map-shaped value into fields of `message`.
	///
	/// `depth` is the nesting level of the frame that delegated here; any
	/// further unwrapping must stay below `ctx.options.max_depth`.
	fn decode(&self, ctx: &DecodeCtx<'_>, entries: &BTreeMap<String, Datum>, message: &MessageDescriptor, depth: u32) -> Result<FieldMap>;
}

/// Timestamp, Duration, and the scalar wrapper types.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWellKnown;

impl WellKnownDecoder for StandardWellKnown {
	fn is_well_known(&self, full_name: &str) -> bool {
		full_name == TIMESTAMP || full_name == DURATION || wrapper_branch(full_name).is_some()
	}

	fn decode(&self, ctx: &DecodeCtx<'_>, entries: &BTreeMap<String, Datum>, message: &MessageDescriptor, depth: u32) -> Result<FieldMap> {
		let type_name = message.full_name.as_ref();
		if let Some((key, inner)) = single_entry(entries)
			&& key == type_name
		{
			let inner = match inner {
				Datum::Null => return Ok(FieldMap::new()),
				Datum::Map(inner) => inner,
				other => return Err(fail(type_name, format!("expected map, got {}", other.kind_name()))),
			};
			let depth = depth + 1;
			let max_depth = ctx.options.max_depth;
			if depth >= max_depth {
				return Err(DecodeError::DepthExceeded { max_depth });
			}
			return self.decode(ctx, inner, message, depth);
		}

		if type_name == TIMESTAMP {
			decode_timestamp(entries)
		} else if type_name == DURATION {
			decode_seconds_nanos(type_name, entries)
		} else if let Some(branch) = wrapper_branch(type_name) {
			decode_wrapper(ctx, entries, message, branch, depth)
		} else {
			Err(DecodeError::UnsupportedKind { kind: type_name.to_owned() })
		}
	}
}

/// Message definitions registered in every pool.
pub(crate) fn well_known_defs() -> Vec<MessageDef> {
	let seconds_nanos = || vec![FieldDef::scalar("seconds", 1, KindDef::Int64), FieldDef::scalar("nanos", 2, KindDef::Int32)];

	let mut defs = vec![
		MessageDef {
			name: TIMESTAMP.to_owned(),
			fields: seconds_nanos(),
		},
		MessageDef {
			name: DURATION.to_owned(),
			fields: seconds_nanos(),
		},
	];
	defs.extend(WRAPPERS.iter().map(|(name, _, kind)| MessageDef {
		name: (*name).to_owned(),
		fields: vec![FieldDef::scalar("value", 1, *kind)],
	}));
	defs
}

fn wrapper_branch(full_name: &str) -> Option<&'static str> {
	WRAPPERS.iter().find(|(name, _, _)| *name == full_name).map(|(_, branch, _)| *branch)
}

fn decode_timestamp(entries: &BTreeMap<String, Datum>) -> Result<FieldMap> {
	let Some((TIMESTAMP_MICROS, micros)) = single_entry(entries) else {
		return decode_seconds_nanos(TIMESTAMP, entries);
	};
	let micros = decode_int_like(micros, "long").map_err(|err| fail(TIMESTAMP, err.to_string()))?;

	let seconds = micros.div_euclid(MICROS_PER_SECOND);
	let nanos = micros.rem_euclid(MICROS_PER_SECOND) * NANOS_PER_MICRO;
	Ok(FieldMap::from([(1, Value::I64(seconds)), (2, Value::I32(nanos as i32))]))
}

fn decode_seconds_nanos(type_name: &str, entries: &BTreeMap<String, Datum>) -> Result<FieldMap> {
	let mut out = FieldMap::new();
	for (key, datum) in entries {
		let (number, role) = match key.as_str() {
			"seconds" => (1, "long"),
			"nanos" => (2, "int"),
			_ => return Err(fail(type_name, format!("unexpected field {key}"))),
		};
		if datum.is_null() {
			continue;
		}
		let raw = decode_int_like(datum, role).map_err(|err| fail(type_name, format!("field {key}: {err}")))?;
		let value = if number == 1 { Value::I64(raw) } else { Value::I32(raw as i32) };
		out.insert(number, value);
	}
	Ok(out)
}

fn decode_wrapper(ctx: &DecodeCtx<'_>, entries: &BTreeMap<String, Datum>, message: &MessageDescriptor, branch: &str, depth: u32) -> Result<FieldMap> {
	let type_name = message.full_name.as_ref();
	let field = message.field_by_number(1).ok_or_else(|| fail(type_name, "missing value field"))?;

	let datum = match single_entry(entries) {
		Some((key, datum)) if key == branch || key == "value" => datum,
		_ => return Err(fail(type_name, format!("expected {{\"{branch}\": ...}}"))),
	};
	if datum.is_null() {
		return Ok(FieldMap::new());
	}

	let value = decode_scalar(ctx, datum, field, depth)?;
	Ok(FieldMap::from([(field.number, value)]))
}

fn fail(type_name: &str, reason: impl Into<String>) -> DecodeError {
	DecodeError::WellKnown {
		type_name: type_name.to_owned(),
		reason: reason.into(),
	}
}
