use std::collections::BTreeMap;
use std::fmt;

use crate::avro::{DescriptorPool, FieldDescriptor, Kind};

/// Decoded field values keyed by field number.
pub type FieldMap = BTreeMap<u32, Value>;

/// Typed value of one field, list element, or map entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// `bool`.
	Bool(bool),
	/// `int32`, `sint32`, `sfixed32`.
	I32(i32),
	/// `int64`, `sint64`, `sfixed64`.
	I64(i64),
	/// `uint32`, `fixed32`.
	U32(u32),
	/// `uint64`, `fixed64`.
	U64(u64),
	/// `float`.
	F32(f32),
	/// `double`.
	F64(f64),
	/// `string`.
	String(String),
	/// `bytes`.
	Bytes(Vec<u8>),
	/// Enum by number.
	EnumNumber(i32),
	/// Nested message or group.
	Message(DynamicMessage),
	/// Contents of a list field.
	List(Vec<Value>),
	/// Contents of a map field.
	Map(BTreeMap<MapKey, Value>),
}

impl Value {
	/// Zero value of a singular `kind`.
	pub fn default_for(pool: &DescriptorPool, kind: Kind) -> Self {
		match kind {
			Kind::Double => Value::F64(0.0),
			Kind::Float => Value::F32(0.0),
			Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Value::I32(0),
			Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => Value::I64(0),
			Kind::Uint32 | Kind::Fixed32 => Value::U32(0),
			Kind::Uint64 | Kind::Fixed64 => Value::U64(0),
			Kind::Bool => Value::Bool(false),
			Kind::String => Value::String(String::new()),
			Kind::Bytes => Value::Bytes(Vec::new()),
			Kind::Enum(_) => Value::EnumNumber(0),
			Kind::Message(idx) | Kind::Group(idx) => Value::Message(DynamicMessage::new(pool, idx)),
		}
	}

	/// Value a field reads as when unset: empty containers for list/map fields.
	pub fn default_for_field(pool: &DescriptorPool, field: &FieldDescriptor) -> Self {
		if field.is_list() {
			Value::List(Vec::new())
		} else if field.is_map() {
			Value::Map(BTreeMap::new())
		} else {
			Value::default_for(pool, field.kind)
		}
	}

	/// Name of the variant, for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Bool(_) => "bool",
			Value::I32(_) => "i32",
			Value::I64(_) => "i64",
			Value::U32(_) => "u32",
			Value::U64(_) => "u64",
			Value::F32(_) => "f32",
			Value::F64(_) => "f64",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::EnumNumber(_) => "enum",
			Value::Message(_) => "message",
			Value::List(_) => "list",
			Value::Map(_) => "map",
		}
	}

	/// Borrow string contents.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow nested message.
	pub fn as_message(&self) -> Option<&DynamicMessage> {
		match self {
			Value::Message(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow list elements.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow map entries.
	pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
		match self {
			Value::Map(v) => Some(v),
			_ => None,
		}
	}
}

/// Typed key of a map field entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
	/// `bool` key.
	Bool(bool),
	/// Signed 32-bit key.
	I32(i32),
	/// Signed 64-bit key.
	I64(i64),
	/// Unsigned 32-bit key.
	U32(u32),
	/// Unsigned 64-bit key.
	U64(u64),
	/// `string` key.
	String(String),
}

impl fmt::Display for MapKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MapKey::Bool(v) => write!(f, "{v}"),
			MapKey::I32(v) => write!(f, "{v}"),
			MapKey::I64(v) => write!(f, "{v}"),
			MapKey::U32(v) => write!(f, "{v}"),
			MapKey::U64(v) => write!(f, "{v}"),
			MapKey::String(v) => f.write_str(v),
		}
	}
}

/// Message instance built by the decoder.
///
/// Unset fields are absent from [`DynamicMessage::fields`] and read as their zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
	/// Fully-qualified message type name.
	pub type_name: Box<str>,
	/// Index into [`DescriptorPool::messages`].
	pub message: u32,
	fields: FieldMap,
}

impl DynamicMessage {
	/// Empty instance of message `idx`.
	pub fn new(pool: &DescriptorPool, idx: u32) -> Self {
		Self {
			type_name: pool.message(idx).full_name.clone(),
			message: idx,
			fields: FieldMap::new(),
		}
	}

	/// Set fields, keyed by number.
	pub fn fields(&self) -> &FieldMap {
		&self.fields
	}

	/// Number of set fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether no field is set.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Whether field `number` is set.
	pub fn has(&self, number: u32) -> bool {
		self.fields.contains_key(&number)
	}

	/// Value of field `number` if set.
	pub fn get_by_number(&self, number: u32) -> Option<&Value> {
		self.fields.get(&number)
	}

	/// Value of a set field, looked up by declared or JSON name.
	pub fn get<'a>(&'a self, pool: &DescriptorPool, name: &str) -> Option<&'a Value> {
		let desc = pool.message(self.message);
		let field = desc.field_by_text_name(name).or_else(|| desc.field_by_json_name(name))?;
		self.fields.get(&field.number)
	}

	/// Value of a field by name, falling back to its zero value when unset.
	pub fn get_or_default(&self, pool: &DescriptorPool, name: &str) -> Option<Value> {
		let desc = pool.message(self.message);
		let field = desc.field_by_text_name(name).or_else(|| desc.field_by_json_name(name))?;
		Some(
			self.fields
				.get(&field.number)
				.cloned()
				.unwrap_or_else(|| Value::default_for_field(pool, field)),
		)
	}

	/// Set field `number`, replacing any previous value.
	pub fn set(&mut self, number: u32, value: Value) {
		self.fields.insert(number, value);
	}

	/// Unset field `number`.
	pub fn clear(&mut self, number: u32) -> Option<Value> {
		self.fields.remove(&number)
	}

	/// Write every staged value into this message in one pass.
	pub fn commit(&mut self, staged: FieldMap) {
		for (number, value) in staged {
			self.fields.insert(number, value);
		}
	}
}
