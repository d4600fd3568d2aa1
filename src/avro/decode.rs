use crate::avro::coerce::single_entry;
use crate::avro::collection::{decode_list, decode_map};
use crate::avro::resolve::{Resolved, resolve_field};
use crate::avro::scalar::decode_scalar;
use crate::avro::wkt::{StandardWellKnown, WellKnownDecoder};
use crate::avro::{Cardinality, DecodeError, Datum, DescriptorPool, DynamicMessage, FieldDescriptor, FieldMap, Result, Value};

static STANDARD_WELL_KNOWN: StandardWellKnown = StandardWellKnown;

/// Field name that resolves without error but whose value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
	/// Input key to ignore.
	pub field_name: String,
}

/// Runtime limits and behavior switches for Avro JSON decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Keys accepted and dropped when no schema field matches.
	pub extra_fields: Vec<ExtraField>,
	/// Maximum nested message depth, union unwraps included.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			extra_fields: Vec::new(),
			max_depth: 64,
		}
	}
}

impl DecodeOptions {
	/// Default options ignoring the given extra field names.
	pub fn with_extra_fields<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
		Self {
			extra_fields: names.into_iter().map(|name| ExtraField { field_name: name.into() }).collect(),
			..Self::default()
		}
	}
}

/// Read-only state shared by every frame of one decode.
#[derive(Clone, Copy)]
pub struct DecodeCtx<'a> {
	/// Schema tables.
	pub pool: &'a DescriptorPool,
	/// Decode options.
	pub options: &'a DecodeOptions,
	/// Handler for well-known types.
	pub well_known: &'a dyn WellKnownDecoder,
}

impl<'a> DecodeCtx<'a> {
	/// Context using [`StandardWellKnown`].
	pub fn new(pool: &'a DescriptorPool, options: &'a DecodeOptions) -> Self {
		Self {
			pool,
			options,
			well_known: &STANDARD_WELL_KNOWN,
		}
	}

	/// Replace the well-known type handler.
	pub fn with_well_known(self, well_known: &'a dyn WellKnownDecoder) -> Self {
		Self { well_known, ..self }
	}
}

/// Decode `datum` into a new instance of message `full_name`.
pub fn decode_message(pool: &DescriptorPool, full_name: &str, datum: &Datum, opt: &DecodeOptions) -> Result<DynamicMessage> {
	let idx = pool.message_index(full_name).ok_or_else(|| DecodeError::MessageNotFound { name: full_name.to_owned() })?;
	let ctx = DecodeCtx::new(pool, opt);
	let mut message = DynamicMessage::new(pool, idx);
	decode_into(&ctx, datum, &mut message)?;
	Ok(message)
}

/// Parse Avro JSON text and decode it into message `full_name`.
pub fn decode_json(pool: &DescriptorPool, full_name: &str, text: &str, opt: &DecodeOptions) -> Result<DynamicMessage> {
	let datum = Datum::from_json_str(text)?;
	decode_message(pool, full_name, &datum, opt)
}

/// Decode `datum` into an existing message.
///
/// Values are staged and committed only after the whole input decoded, so on
/// error `dest` is unchanged. `null` input is a no-op.
pub fn decode_into(ctx: &DecodeCtx<'_>, datum: &Datum, dest: &mut DynamicMessage) -> Result<()> {
	let staged = decode_message_fields(ctx, datum, dest.message, 0)?;
	dest.commit(staged);
	Ok(())
}

pub(crate) fn decode_message_fields(ctx: &DecodeCtx<'_>, datum: &Datum, message: u32, depth: u32) -> Result<FieldMap> {
	let entries = match datum {
		Datum::Null => return Ok(FieldMap::new()),
		Datum::Map(entries) => entries,
		other => return Err(DecodeError::type_mismatch("message encoded as map", other.kind_name())),
	};

	let max_depth = ctx.options.max_depth;
	if depth >= max_depth {
		return Err(DecodeError::DepthExceeded { max_depth });
	}

	let desc = ctx.pool.message(message);
	if ctx.well_known.is_well_known(&desc.full_name) {
		return ctx.well_known.decode(ctx, entries, desc, depth);
	}

	if let Some((key, inner)) = single_entry(entries)
		&& key == desc.full_name.as_ref()
	{
		tracing::trace!("unwrapping union branch {key}");
		return decode_message_fields(ctx, inner, message, depth + 1);
	}

	let mut staged = FieldMap::new();
	for (name, value) in entries {
		let field = match resolve_field(desc, name, ctx.options) {
			Resolved::Field(field) => field,
			Resolved::Ignored => {
				tracing::debug!("ignoring extra field {name} on {}", desc.full_name);
				continue;
			}
			Resolved::NotFound => return Err(DecodeError::UnknownField { name: name.clone() }),
		};
		if value.is_null() {
			continue;
		}

		tracing::trace!("decoding {}.{} ({})", desc.full_name, field.name, field.kind);
		let decoded = decode_field(ctx, value, field, depth)?;
		staged.insert(field.number, decoded);
	}

	Ok(staged)
}

fn decode_field(ctx: &DecodeCtx<'_>, datum: &Datum, field: &FieldDescriptor, depth: u32) -> Result<Value> {
	match field.cardinality {
		Cardinality::Map { key } => decode_map(ctx, datum, field, key, depth).map(Value::Map),
		Cardinality::List => decode_list(ctx, datum, field, depth).map(Value::List),
		Cardinality::Singular => decode_scalar(ctx, datum, field, depth),
	}
}
