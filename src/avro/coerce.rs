//! Shape checks for primitive Avro JSON values.
//!
//! Every helper accepts either the bare shape or Avro's JSON union encoding of
//! it, a single-key map whose key is the branch name passed as `role`.

use std::collections::BTreeMap;

use crate::avro::{DecodeError, Datum, Result};

/// Accept a string, or `{role: string}`.
pub fn decode_string_like(datum: &Datum, role: &str) -> Result<String> {
	match datum {
		Datum::String(v) => Ok(v.clone()),
		Datum::Map(_) => decode_string_like(union_branch(datum, role)?, role),
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// Accept a boolean, or `{role: boolean}`.
pub fn decode_bool_like(datum: &Datum, role: &str) -> Result<bool> {
	match datum {
		Datum::Boolean(v) => Ok(*v),
		Datum::Map(_) => decode_bool_like(union_branch(datum, role)?, role),
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// Accept an int or long, or `{role: int|long}`, widened to 64 bits.
pub fn decode_int_like(datum: &Datum, role: &str) -> Result<i64> {
	match datum {
		Datum::Int(v) => Ok(i64::from(*v)),
		Datum::Long(v) => Ok(*v),
		Datum::Map(_) => decode_int_like(union_branch(datum, role)?, role),
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// Accept bytes, or `{role: bytes}`.
///
/// Strings are accepted when every code point is at most U+00FF, which is how
/// Avro JSON writes `bytes`; each code point becomes one byte.
pub fn decode_bytes_like(datum: &Datum, role: &str) -> Result<Vec<u8>> {
	match datum {
		Datum::Bytes(v) => Ok(v.clone()),
		Datum::String(v) => v
			.chars()
			.map(|ch| u8::try_from(u32::from(ch)).map_err(|_| DecodeError::type_mismatch(role, "string")))
			.collect(),
		Datum::Map(_) => decode_bytes_like(union_branch(datum, role)?, role),
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// Accept an array, or `{role: array}`.
pub fn decode_list_like<'a>(datum: &'a Datum, role: &str) -> Result<&'a [Datum]> {
	match datum {
		Datum::Array(items) => Ok(items),
		Datum::Map(_) => decode_list_like(union_branch(datum, role)?, role),
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// Accept a map, unwrapping `{role: map}` once when the only key is `role`.
///
/// The union encoding is indistinguishable from a real one-entry map whose key
/// equals `role` and whose value is itself a map: `{"map": {"k": ...}}` for a
/// map of messages is always read as the wrapper around `{"k": ...}`. Such a
/// map has to be written in its wrapped form, `{"map": {"map": {...}}}`.
pub fn decode_map_like<'a>(datum: &'a Datum, role: &str) -> Result<&'a BTreeMap<String, Datum>> {
	match datum {
		Datum::Map(entries) => match single_entry(entries) {
			Some((key, Datum::Map(inner))) if key == role => Ok(inner),
			_ => Ok(entries),
		},
		other => Err(DecodeError::type_mismatch(role, other.kind_name())),
	}
}

/// The only entry of a one-key map.
pub(crate) fn single_entry(entries: &BTreeMap<String, Datum>) -> Option<(&str, &Datum)> {
	if entries.len() != 1 {
		return None;
	}
	entries.iter().next().map(|(key, value)| (key.as_str(), value))
}

fn union_branch<'a>(datum: &'a Datum, role: &str) -> Result<&'a Datum> {
	datum
		.as_map()
		.and_then(|entries| entries.get(role))
		.ok_or_else(|| DecodeError::type_mismatch(role, datum.kind_name()))
}

#[cfg(test)]
mod tests {
	use super::{decode_bool_like, decode_bytes_like, decode_int_like, decode_list_like, decode_map_like, decode_string_like};
	use crate::avro::{DecodeError, Datum};

	#[test]
	fn bare_string_is_accepted() {
		assert_eq!(decode_string_like(&Datum::from("a"), "string").expect("string decodes"), "a");
	}

	#[test]
	fn union_wrapped_string_is_unwrapped_by_role() {
		let datum = Datum::union("string", Datum::from("a"));
		assert_eq!(decode_string_like(&datum, "string").expect("union decodes"), "a");
	}

	#[test]
	fn union_with_other_branch_is_rejected() {
		let datum = Datum::union("long", Datum::Long(1));
		let err = decode_string_like(&datum, "string").expect_err("wrong branch fails");
		assert!(matches!(err, DecodeError::TypeMismatch { ref expected, got: "map" } if expected == "string"));
	}

	#[test]
	fn mismatch_reports_role_and_actual_shape() {
		let err = decode_bool_like(&Datum::Long(1), "boolean").expect_err("long is not boolean");
		assert_eq!(err.to_string(), "expected boolean, got long");
	}

	#[test]
	fn int_and_long_both_widen() {
		assert_eq!(decode_int_like(&Datum::Int(-3), "int").expect("int decodes"), -3);
		assert_eq!(decode_int_like(&Datum::Long(1 << 40), "long").expect("long decodes"), 1 << 40);
		assert_eq!(decode_int_like(&Datum::union("int", Datum::Long(7)), "int").expect("union decodes"), 7);
	}

	#[test]
	fn float_is_not_int_like() {
		assert!(decode_int_like(&Datum::Double(1.0), "long").is_err());
	}

	#[test]
	fn latin1_strings_decode_as_bytes() {
		assert_eq!(decode_bytes_like(&Datum::from("a\u{ff}"), "bytes").expect("latin1 decodes"), vec![b'a', 0xff]);
		assert!(decode_bytes_like(&Datum::from("\u{100}"), "bytes").is_err());
	}

	#[test]
	fn list_like_accepts_array_union() {
		let datum = Datum::union("array", Datum::Array(vec![Datum::Int(1)]));
		assert_eq!(decode_list_like(&datum, "array").expect("array decodes").len(), 1);
		assert!(decode_list_like(&Datum::from("x"), "array").is_err());
	}

	#[test]
	fn map_like_unwraps_only_map_branch() {
		let inner = Datum::map([("k", Datum::Long(1))]);
		let wrapped = Datum::union("map", inner.clone());
		assert_eq!(decode_map_like(&wrapped, "map").expect("map decodes"), inner.as_map().expect("map"));

		let plain = Datum::map([("map", Datum::Long(1))]);
		assert_eq!(decode_map_like(&plain, "map").expect("map decodes").len(), 1);
	}

	#[test]
	fn map_valued_role_key_is_read_as_wrapper() {
		let message = Datum::map([("title", Datum::from("a"))]);
		let ambiguous = Datum::union("map", message.clone());
		assert_eq!(decode_map_like(&ambiguous, "map").expect("map decodes"), message.as_map().expect("map"));

		let wrapped = Datum::union("map", ambiguous.clone());
		assert_eq!(decode_map_like(&wrapped, "map").expect("map decodes"), ambiguous.as_map().expect("map"));
	}
}
