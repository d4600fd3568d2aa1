use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::avro::wkt::well_known_defs;
use crate::avro::{DecodeError, Result};

/// Declared kind of a field or of the elements of a list/map field.
///
/// Nested types refer to pool tables by index so recursive schemas are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// 64-bit IEEE float.
	Double,
	/// 32-bit IEEE float.
	Float,
	/// Signed 32-bit varint.
	Int32,
	/// Signed 64-bit varint.
	Int64,
	/// Unsigned 32-bit varint.
	Uint32,
	/// Unsigned 64-bit varint.
	Uint64,
	/// Zigzag 32-bit.
	Sint32,
	/// Zigzag 64-bit.
	Sint64,
	/// Unsigned fixed 32-bit.
	Fixed32,
	/// Unsigned fixed 64-bit.
	Fixed64,
	/// Signed fixed 32-bit.
	Sfixed32,
	/// Signed fixed 64-bit.
	Sfixed64,
	/// Boolean.
	Bool,
	/// UTF-8 string.
	String,
	/// Opaque bytes.
	Bytes,
	/// Enum, by index into [`DescriptorPool::enums`].
	Enum(u32),
	/// Nested message, by index into [`DescriptorPool::messages`].
	Message(u32),
	/// Legacy group, by index into [`DescriptorPool::messages`].
	Group(u32),
}

impl Kind {
	/// Schema-level tag of this kind.
	pub fn tag(self) -> &'static str {
		match self {
			Kind::Double => "double",
			Kind::Float => "float",
			Kind::Int32 => "int32",
			Kind::Int64 => "int64",
			Kind::Uint32 => "uint32",
			Kind::Uint64 => "uint64",
			Kind::Sint32 => "sint32",
			Kind::Sint64 => "sint64",
			Kind::Fixed32 => "fixed32",
			Kind::Fixed64 => "fixed64",
			Kind::Sfixed32 => "sfixed32",
			Kind::Sfixed64 => "sfixed64",
			Kind::Bool => "bool",
			Kind::String => "string",
			Kind::Bytes => "bytes",
			Kind::Enum(_) => "enum",
			Kind::Message(_) => "message",
			Kind::Group(_) => "group",
		}
	}

	/// Message table index for message and group kinds.
	pub fn message_index(self) -> Option<u32> {
		match self {
			Kind::Message(idx) | Kind::Group(idx) => Some(idx),
			_ => None,
		}
	}

	/// Whether this kind may key a map field.
	pub fn is_map_key(self) -> bool {
		!matches!(self, Kind::Double | Kind::Float | Kind::Bytes | Kind::Enum(_) | Kind::Message(_) | Kind::Group(_))
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
	/// Zero or one value.
	Singular,
	/// Ordered list of values of the field kind.
	List,
	/// Map from `key` kind to values of the field kind.
	Map {
		/// Declared key kind.
		key: Kind,
	},
}

/// One field declaration.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	/// Declared (text) name.
	pub name: Box<str>,
	/// JSON (lowerCamelCase) name.
	pub json_name: Box<str>,
	/// Field number, unique within the message.
	pub number: u32,
	/// Value kind (element kind for lists, value kind for maps).
	pub kind: Kind,
	/// Singular, list, or map.
	pub cardinality: Cardinality,
}

impl FieldDescriptor {
	/// Whether this is a repeated (non-map) field.
	pub fn is_list(&self) -> bool {
		self.cardinality == Cardinality::List
	}

	/// Whether this is a map field.
	pub fn is_map(&self) -> bool {
		matches!(self.cardinality, Cardinality::Map { .. })
	}
}

/// One message declaration.
#[derive(Debug, Clone)]
pub struct MessageDescriptor {
	/// Fully-qualified type name, e.g. `pkg.Msg`.
	pub full_name: Box<str>,
	/// Field declarations in source order.
	pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
	/// Look up a field by its JSON name.
	pub fn field_by_json_name(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| field.json_name.as_ref() == name)
	}

	/// Look up a field by its declared name.
	pub fn field_by_text_name(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| field.name.as_ref() == name)
	}

	/// Look up a field by number.
	pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| field.number == number)
	}
}

/// One enum value.
#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
	/// Value name, e.g. `RED`.
	pub name: Box<str>,
	/// Numeric value.
	pub number: i32,
}

/// One enum declaration.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
	/// Fully-qualified type name.
	pub full_name: Box<str>,
	/// Value table in source order.
	pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
	/// Look up a value by name.
	pub fn value_by_name(&self, name: &str) -> Option<&EnumValueDescriptor> {
		self.values.iter().find(|value| value.name.as_ref() == name)
	}

	/// Look up the first value declared with `number`.
	pub fn value_by_number(&self, number: i32) -> Option<&EnumValueDescriptor> {
		self.values.iter().find(|value| value.number == number)
	}
}

/// Read-only table of every message and enum a decode can reach.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
	/// Message declarations.
	pub messages: Vec<MessageDescriptor>,
	/// Enum declarations.
	pub enums: Vec<EnumDescriptor>,
	message_by_name: HashMap<Box<str>, u32>,
	enum_by_name: HashMap<Box<str>, u32>,
}

impl DescriptorPool {
	/// Load a JSON schema definition file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let text = fs::read_to_string(path)?;
		Self::from_json_str(&text)
	}

	/// Parse a JSON schema definition.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let def: PoolDef = serde_json::from_str(text)?;
		Self::from_def(def)
	}

	/// Convert an already-parsed JSON schema definition.
	pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
		let def: PoolDef = serde_json::from_value(value)?;
		Self::from_def(def)
	}

	/// Build a pool from definitions, adding the well-known types.
	pub fn from_def(def: PoolDef) -> Result<Self> {
		let mut message_defs = well_known_defs();
		message_defs.extend(def.messages);
		let enum_defs = def.enums;

		let mut message_by_name = HashMap::with_capacity(message_defs.len());
		for (idx, item) in message_defs.iter().enumerate() {
			if message_by_name.insert(item.name.clone().into_boxed_str(), idx as u32).is_some() {
				return Err(DecodeError::schema(format!("duplicate message {}", item.name)));
			}
		}

		let mut enum_by_name = HashMap::with_capacity(enum_defs.len());
		for (idx, item) in enum_defs.iter().enumerate() {
			if message_by_name.contains_key(item.name.as_str()) || enum_by_name.insert(item.name.clone().into_boxed_str(), idx as u32).is_some() {
				return Err(DecodeError::schema(format!("duplicate type {}", item.name)));
			}
		}

		let mut pool = Self {
			messages: Vec::with_capacity(message_defs.len()),
			enums: Vec::with_capacity(enum_defs.len()),
			message_by_name,
			enum_by_name,
		};

		for item in enum_defs {
			pool.enums.push(EnumDescriptor {
				full_name: item.name.into_boxed_str(),
				values: item
					.values
					.into_iter()
					.map(|value| EnumValueDescriptor {
						name: value.name.into_boxed_str(),
						number: value.number,
					})
					.collect(),
			});
		}

		for item in message_defs {
			let message = pool.build_message(item)?;
			pool.messages.push(message);
		}

		Ok(pool)
	}

	/// Look up message index by fully-qualified name.
	pub fn message_index(&self, full_name: &str) -> Option<u32> {
		self.message_by_name.get(full_name).copied()
	}

	/// Look up message declaration by fully-qualified name.
	pub fn message_by_name(&self, full_name: &str) -> Option<&MessageDescriptor> {
		self.message_index(full_name).map(|idx| self.message(idx))
	}

	/// Look up enum declaration by fully-qualified name.
	pub fn enum_by_name(&self, full_name: &str) -> Option<&EnumDescriptor> {
		self.enum_by_name.get(full_name).map(|idx| self.enum_(*idx))
	}

	/// Return message declaration by table index.
	pub fn message(&self, idx: u32) -> &MessageDescriptor {
		&self.messages[idx as usize]
	}

	/// Return enum declaration by table index.
	pub fn enum_(&self, idx: u32) -> &EnumDescriptor {
		&self.enums[idx as usize]
	}

	fn build_message(&self, def: MessageDef) -> Result<MessageDescriptor> {
		let mut numbers = HashSet::with_capacity(def.fields.len());
		let mut names = HashSet::with_capacity(def.fields.len());
		let mut fields = Vec::with_capacity(def.fields.len());

		for field in def.fields {
			if !numbers.insert(field.number) {
				return Err(DecodeError::schema(format!("{}: duplicate field number {}", def.name, field.number)));
			}
			if !names.insert(field.name.clone()) {
				return Err(DecodeError::schema(format!("{}: duplicate field {}", def.name, field.name)));
			}

			let kind = self.resolve_kind(&def.name, &field)?;
			let cardinality = match field.label {
				LabelDef::Optional => Cardinality::Singular,
				LabelDef::Repeated => Cardinality::List,
				LabelDef::Map => {
					let key_def = field
						.map_key
						.ok_or_else(|| DecodeError::schema(format!("{}.{}: map field without map_key", def.name, field.name)))?;
					let key = scalar_kind(key_def)
						.filter(|key| key.is_map_key())
						.ok_or_else(|| DecodeError::schema(format!("{}.{}: invalid map key kind", def.name, field.name)))?;
					Cardinality::Map { key }
				}
			};

			let json_name = field.json_name.unwrap_or_else(|| json_name_of(&field.name));
			fields.push(FieldDescriptor {
				name: field.name.into_boxed_str(),
				json_name: json_name.into_boxed_str(),
				number: field.number,
				kind,
				cardinality,
			});
		}

		Ok(MessageDescriptor {
			full_name: def.name.into_boxed_str(),
			fields,
		})
	}

	fn resolve_kind(&self, owner: &str, field: &FieldDef) -> Result<Kind> {
		if let Some(kind) = scalar_kind(field.kind) {
			return Ok(kind);
		}

		let type_name = field
			.type_name
			.as_deref()
			.ok_or_else(|| DecodeError::schema(format!("{owner}.{}: missing type_name", field.name)))?;
		let unknown = || DecodeError::schema(format!("{owner}.{}: unknown type {type_name}", field.name));

		match field.kind {
			KindDef::Enum => self.enum_by_name.get(type_name).map(|idx| Kind::Enum(*idx)).ok_or_else(unknown),
			KindDef::Message => self.message_index(type_name).map(Kind::Message).ok_or_else(unknown),
			KindDef::Group => self.message_index(type_name).map(Kind::Group).ok_or_else(unknown),
			_ => Err(unknown()),
		}
	}
}

/// Derive the lowerCamelCase JSON name protoc assigns to a field.
pub fn json_name_of(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut upper_next = false;
	for ch in name.chars() {
		if ch == '_' {
			upper_next = true;
		} else if upper_next {
			out.extend(ch.to_uppercase());
			upper_next = false;
		} else {
			out.push(ch);
		}
	}
	out
}

fn scalar_kind(def: KindDef) -> Option<Kind> {
	Some(match def {
		KindDef::Double => Kind::Double,
		KindDef::Float => Kind::Float,
		KindDef::Int32 => Kind::Int32,
		KindDef::Int64 => Kind::Int64,
		KindDef::Uint32 => Kind::Uint32,
		KindDef::Uint64 => Kind::Uint64,
		KindDef::Sint32 => Kind::Sint32,
		KindDef::Sint64 => Kind::Sint64,
		KindDef::Fixed32 => Kind::Fixed32,
		KindDef::Fixed64 => Kind::Fixed64,
		KindDef::Sfixed32 => Kind::Sfixed32,
		KindDef::Sfixed64 => Kind::Sfixed64,
		KindDef::Bool => Kind::Bool,
		KindDef::String => Kind::String,
		KindDef::Bytes => Kind::Bytes,
		KindDef::Enum | KindDef::Message | KindDef::Group => return None,
	})
}

/// JSON schema definition: the serialized form of a [`DescriptorPool`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolDef {
	/// Message definitions.
	#[serde(default)]
	pub messages: Vec<MessageDef>,
	/// Enum definitions.
	#[serde(default)]
	pub enums: Vec<EnumDef>,
}

/// Serialized message definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageDef {
	/// Fully-qualified name.
	pub name: String,
	/// Field definitions.
	#[serde(default)]
	pub fields: Vec<FieldDef>,
}

/// Serialized field definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
	/// Declared name.
	pub name: String,
	/// Field number.
	pub number: u32,
	/// Value kind.
	#[serde(rename = "type")]
	pub kind: KindDef,
	/// Referenced type for enum/message/group kinds.
	#[serde(default)]
	pub type_name: Option<String>,
	/// Explicit JSON name; derived from `name` when absent.
	#[serde(default)]
	pub json_name: Option<String>,
	/// Cardinality.
	#[serde(default)]
	pub label: LabelDef,
	/// Key kind for map fields.
	#[serde(default)]
	pub map_key: Option<KindDef>,
}

impl FieldDef {
	/// Singular field of a scalar kind.
	pub fn scalar(name: &str, number: u32, kind: KindDef) -> Self {
		Self {
			name: name.to_owned(),
			number,
			kind,
			type_name: None,
			json_name: None,
			label: LabelDef::Optional,
			map_key: None,
		}
	}
}

/// Serialized kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum KindDef {
	Double,
	Float,
	Int32,
	Int64,
	Uint32,
	Uint64,
	Sint32,
	Sint64,
	Fixed32,
	Fixed64,
	Sfixed32,
	Sfixed64,
	Bool,
	String,
	Bytes,
	Enum,
	Message,
	Group,
}

/// Serialized cardinality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelDef {
	/// Singular field.
	#[default]
	Optional,
	/// List field.
	Repeated,
	/// Map field; requires `map_key`.
	Map,
}

/// Serialized enum definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDef {
	/// Fully-qualified name.
	pub name: String,
	/// Value table.
	pub values: Vec<EnumValueDef>,
}

/// Serialized enum value.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueDef {
	/// Value name.
	pub name: String,
	/// Numeric value.
	pub number: i32,
}

#[cfg(test)]
mod tests;
