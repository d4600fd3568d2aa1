pub mod coerce;
mod collection;
mod datum;
mod decode;
mod descriptor;
mod error;
mod resolve;
mod scalar;
mod value;
pub mod wkt;

/// List and map field assembly.
pub use collection::{decode_list, decode_map};
/// Schema-less Avro JSON input value.
pub use datum::Datum;
/// Message decoding entry points, options, and context.
pub use decode::{DecodeCtx, DecodeOptions, ExtraField, decode_into, decode_json, decode_message};
/// Schema descriptor tables and their JSON definition format.
pub use descriptor::{
	Cardinality, DescriptorPool, EnumDef, EnumDescriptor, EnumValueDef, EnumValueDescriptor, FieldDef, FieldDescriptor, Kind, KindDef, LabelDef, MessageDef,
	MessageDescriptor, PoolDef, json_name_of,
};
/// Error and result aliases.
pub use error::{DecodeError, Result};
/// Field name resolution.
pub use resolve::{Resolved, resolve_field};
/// Per-kind value dispatch.
pub use scalar::decode_scalar;
/// Decoded typed value types.
pub use value::{DynamicMessage, FieldMap, MapKey, Value};
/// Well-known type handling.
pub use wkt::{StandardWellKnown, WellKnownDecoder};
