use std::collections::BTreeMap;

use crate::avro::coerce::{decode_list_like, decode_map_like};
use crate::avro::decode::DecodeCtx;
use crate::avro::scalar::decode_scalar;
use crate::avro::{DecodeError, Datum, FieldDescriptor, Kind, MapKey, Result, Value};

/// Decode the elements of a list field.
///
/// `null` elements become the element zero value so indices are preserved.
/// The list is built in full before the caller stores it.
pub fn decode_list(ctx: &DecodeCtx<'_>, datum: &Datum, field: &FieldDescriptor, depth: u32) -> Result<Vec<Value>> {
	let items = decode_list_like(datum, "array").map_err(|err| err.in_field(&field.name))?;

	let mut out = Vec::with_capacity(items.len());
	for item in items {
		if item.is_null() {
			out.push(Value::default_for(ctx.pool, field.kind));
			continue;
		}
		out.push(decode_scalar(ctx, item, field, depth)?);
	}
	Ok(out)
}

/// Decode the entries of a map field whose keys have kind `key_kind`.
///
/// Avro map keys are always strings; they are parsed into the declared key kind.
/// `null` values become the value zero value.
pub fn decode_map(ctx: &DecodeCtx<'_>, datum: &Datum, field: &FieldDescriptor, key_kind: Kind, depth: u32) -> Result<BTreeMap<MapKey, Value>> {
	let entries = decode_map_like(datum, "map").map_err(|err| err.in_field(&field.name))?;

	let mut out = BTreeMap::new();
	for (raw_key, item) in entries {
		let key = decode_map_key(raw_key, key_kind).map_err(|err| err.in_field(&field.name))?;
		let value = if item.is_null() {
			Value::default_for(ctx.pool, field.kind)
		} else {
			decode_scalar(ctx, item, field, depth)?
		};
		out.insert(key, value);
	}
	Ok(out)
}

fn decode_map_key(raw: &str, kind: Kind) -> Result<MapKey> {
	let mismatch = |expected: &str| DecodeError::type_mismatch(format!("{expected} map key"), "string");

	match kind {
		Kind::String => Ok(MapKey::String(raw.to_owned())),
		Kind::Bool => match raw {
			"true" => Ok(MapKey::Bool(true)),
			"false" => Ok(MapKey::Bool(false)),
			_ => Err(mismatch("boolean")),
		},
		Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => raw.parse().map(MapKey::I32).map_err(|_| mismatch("int")),
		Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => raw.parse().map(MapKey::I64).map_err(|_| mismatch("long")),
		Kind::Uint32 | Kind::Fixed32 => raw.parse().map(MapKey::U32).map_err(|_| mismatch("int")),
		Kind::Uint64 | Kind::Fixed64 => raw.parse().map(MapKey::U64).map_err(|_| mismatch("long")),
		Kind::Double | Kind::Float | Kind::Bytes | Kind::Enum(_) | Kind::Message(_) | Kind::Group(_) => Err(DecodeError::UnsupportedKind {
			kind: format!("map key {kind}"),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::decode_map_key;
	use crate::avro::{DecodeError, Kind, MapKey};

	#[test]
	fn numeric_keys_parse_at_declared_width() {
		assert_eq!(decode_map_key("-7", Kind::Sint32).expect("int key parses"), MapKey::I32(-7));
		assert_eq!(decode_map_key("18446744073709551615", Kind::Fixed64).expect("u64 key parses"), MapKey::U64(u64::MAX));
		assert!(decode_map_key("4294967296", Kind::Uint32).is_err());
	}

	#[test]
	fn bool_keys_accept_only_literals() {
		assert_eq!(decode_map_key("true", Kind::Bool).expect("bool key parses"), MapKey::Bool(true));
		assert!(decode_map_key("yes", Kind::Bool).is_err());
	}

	#[test]
	fn non_scalar_key_kind_is_unsupported() {
		let err = decode_map_key("x", Kind::Double).expect_err("double keys are not supported");
		assert!(matches!(err, DecodeError::UnsupportedKind { ref kind } if kind == "map key double"));
	}
}
