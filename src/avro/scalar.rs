use crate::avro::coerce::{decode_bool_like, decode_bytes_like, decode_int_like, decode_string_like};
use crate::avro::decode::{DecodeCtx, decode_message_fields};
use crate::avro::{DecodeError, Datum, DynamicMessage, FieldDescriptor, Kind, Result, Value};

/// Decode one non-null value of `field`'s kind: a singular field, a list element, or a map value.
///
/// Integers narrow without range checks: 32-bit kinds keep the low 32 bits
/// (two's complement), so `2^32` becomes `0` and `2^31` becomes `i32::MIN`.
/// An enum name missing from the value table decodes to number `0`.
pub fn decode_scalar(ctx: &DecodeCtx<'_>, datum: &Datum, field: &FieldDescriptor, depth: u32) -> Result<Value> {
	let name = field.name.as_ref();
	let in_field = |err: DecodeError| err.in_field(name);

	match field.kind {
		Kind::Message(idx) | Kind::Group(idx) => {
			let mut nested = DynamicMessage::new(ctx.pool, idx);
			nested.commit(decode_message_fields(ctx, datum, idx, depth + 1)?);
			Ok(Value::Message(nested))
		}
		Kind::String => decode_string_like(datum, "string").map(Value::String).map_err(in_field),
		Kind::Bool => decode_bool_like(datum, "boolean").map(Value::Bool).map_err(in_field),
		Kind::Int32 | Kind::Sfixed32 | Kind::Sint32 => decode_int_like(datum, "int").map(|v| Value::I32(v as i32)).map_err(in_field),
		Kind::Int64 | Kind::Sfixed64 | Kind::Sint64 => decode_int_like(datum, "long").map(Value::I64).map_err(in_field),
		Kind::Uint32 | Kind::Fixed32 => decode_int_like(datum, "int").map(|v| Value::U32(v as u32)).map_err(in_field),
		Kind::Uint64 | Kind::Fixed64 => decode_int_like(datum, "long").map(|v| Value::U64(v as u64)).map_err(in_field),
		Kind::Bytes => decode_bytes_like(datum, "bytes").map(Value::Bytes).map_err(in_field),
		Kind::Enum(idx) => {
			let desc = ctx.pool.enum_(idx);
			let symbol = decode_string_like(datum, &desc.full_name).map_err(in_field)?;
			match desc.value_by_name(&symbol) {
				Some(value) => Ok(Value::EnumNumber(value.number)),
				None => {
					tracing::debug!("field {name}: {symbol} is not a {} value, using 0", desc.full_name);
					Ok(Value::EnumNumber(0))
				}
			}
		}
		Kind::Double => match datum {
			Datum::Double(v) => Ok(Value::F64(*v)),
			other => Err(in_field(DecodeError::type_mismatch("double", other.kind_name()))),
		},
		Kind::Float => match datum {
			Datum::Float(v) => Ok(Value::F32(*v)),
			other => Err(in_field(DecodeError::type_mismatch("float", other.kind_name()))),
		},
	}
}
