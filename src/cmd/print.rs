use std::fmt;

use protoavro::avro::{DescriptorPool, DynamicMessage, Kind, Value};

use crate::cmd::util::bytes_to_avro_string;

/// Output truncation limits for decoded messages.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for lists and maps.
	pub max_items: usize,
	/// Maximum nested message depth printed.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_items: 16,
			max_print_depth: 6,
		}
	}
}

/// Indented text tree of a decoded message, rendered through [`fmt::Display`].
pub struct MessageTree<'a> {
	pool: &'a DescriptorPool,
	message: &'a DynamicMessage,
	options: PrintOptions,
}

/// Render a message as an indented text tree.
pub fn render_message<'a>(pool: &'a DescriptorPool, message: &'a DynamicMessage, options: PrintOptions) -> MessageTree<'a> {
	MessageTree { pool, message, options }
}

impl fmt::Display for MessageTree<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.write_message(f, self.message, 0, 0)
	}
}

impl MessageTree<'_> {
	fn write_message(&self, f: &mut fmt::Formatter<'_>, message: &DynamicMessage, indent: usize, depth: u32) -> fmt::Result {
		if depth >= self.options.max_print_depth {
			return writeln!(f, "{} {{ ... }}", message.type_name);
		}

		let pad = " ".repeat(indent);
		let desc = self.pool.message(message.message);
		writeln!(f, "{} {{", message.type_name)?;
		for (number, value) in message.fields() {
			let (name, kind) = match desc.field_by_number(*number) {
				Some(field) => (field.name.to_string(), Some(field.kind)),
				None => (format!("#{number}"), None),
			};
			write!(f, "{pad}  {name} = ")?;
			self.write_value(f, value, kind, indent + 2, depth + 1)?;
		}
		writeln!(f, "{pad}}}")
	}

	fn write_value(&self, f: &mut fmt::Formatter<'_>, value: &Value, kind: Option<Kind>, indent: usize, depth: u32) -> fmt::Result {
		let pad = " ".repeat(indent);
		let max_items = self.options.max_items;
		match value {
			Value::Message(message) => self.write_message(f, message, indent, depth),
			Value::List(items) => {
				writeln!(f, "[")?;
				for item in items.iter().take(max_items) {
					write!(f, "{pad}  ")?;
					self.write_value(f, item, kind, indent + 2, depth)?;
				}
				if items.len() > max_items {
					writeln!(f, "{pad}  ... {} more", items.len() - max_items)?;
				}
				writeln!(f, "{pad}]")
			}
			Value::Map(entries) => {
				writeln!(f, "{{")?;
				for (key, item) in entries.iter().take(max_items) {
					write!(f, "{pad}  {key}: ")?;
					self.write_value(f, item, kind, indent + 2, depth)?;
				}
				if entries.len() > max_items {
					writeln!(f, "{pad}  ... {} more", entries.len() - max_items)?;
				}
				writeln!(f, "{pad}}}")
			}
			Value::String(v) => writeln!(f, "\"{}\"", truncate(v, self.options.max_string_len)),
			Value::Bytes(v) => writeln!(f, "bytes[{}]", v.len()),
			Value::EnumNumber(number) => writeln!(f, "{}", enum_label(self.pool, kind, *number)),
			scalar => writeln!(f, "{}", scalar_json(scalar)),
		}
	}
}

/// Convert a message to JSON keyed by field JSON names.
pub fn message_to_json(pool: &DescriptorPool, message: &DynamicMessage) -> serde_json::Value {
	use serde_json::{Map, Value as JsonValue};

	let desc = pool.message(message.message);
	let fields: Map<String, JsonValue> = message
		.fields()
		.iter()
		.map(|(number, value)| match desc.field_by_number(*number) {
			Some(field) => (field.json_name.to_string(), value_to_json(pool, value, Some(field.kind))),
			None => (number.to_string(), value_to_json(pool, value, None)),
		})
		.collect();
	JsonValue::Object(fields)
}

fn value_to_json(pool: &DescriptorPool, value: &Value, kind: Option<Kind>) -> serde_json::Value {
	use serde_json::Value as JsonValue;

	match value {
		Value::Message(message) => message_to_json(pool, message),
		Value::List(items) => JsonValue::Array(items.iter().map(|item| value_to_json(pool, item, kind)).collect()),
		Value::Map(entries) => JsonValue::Object(entries.iter().map(|(key, item)| (key.to_string(), value_to_json(pool, item, kind))).collect()),
		Value::EnumNumber(number) => serde_json::json!(enum_label(pool, kind, *number)),
		Value::Bytes(v) => serde_json::json!(bytes_to_avro_string(v)),
		scalar => scalar_json(scalar),
	}
}

fn scalar_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Bool(v) => serde_json::json!(v),
		Value::I32(v) => serde_json::json!(v),
		Value::I64(v) => serde_json::json!(v),
		Value::U32(v) => serde_json::json!(v),
		Value::U64(v) => serde_json::json!(v),
		Value::F32(v) => serde_json::json!(v),
		Value::F64(v) => serde_json::json!(v),
		Value::String(v) => serde_json::json!(v),
		Value::EnumNumber(v) => serde_json::json!(v),
		Value::Bytes(v) => serde_json::json!(bytes_to_avro_string(v)),
		Value::Message(_) | Value::List(_) | Value::Map(_) => serde_json::Value::Null,
	}
}

fn enum_label(pool: &DescriptorPool, kind: Option<Kind>, number: i32) -> String {
	let Some(Kind::Enum(idx)) = kind else {
		return number.to_string();
	};
	pool.enum_(idx)
		.value_by_number(number)
		.map(|value| value.name.to_string())
		.unwrap_or_else(|| number.to_string())
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests {
	use protoavro::avro::{DecodeOptions, DescriptorPool, decode_json};

	use super::{PrintOptions, message_to_json, render_message};

	fn test_pool() -> DescriptorPool {
		DescriptorPool::from_json_value(serde_json::json!({
			"enums": [{ "name": "pkg.Color", "values": [{ "name": "RED", "number": 0 }, { "name": "BLUE", "number": 1 }] }],
			"messages": [{ "name": "pkg.Msg", "fields": [
				{ "name": "display_name", "number": 1, "type": "string" },
				{ "name": "colors", "number": 2, "type": "enum", "type_name": "pkg.Color", "label": "repeated" },
				{ "name": "child", "number": 3, "type": "message", "type_name": "pkg.Msg" }
			] }]
		}))
		.expect("test schema builds")
	}

	#[test]
	fn json_uses_json_names_and_enum_symbols() {
		let pool = test_pool();
		let msg = decode_json(&pool, "pkg.Msg", r#"{"display_name": "a", "colors": ["BLUE", "RED"], "child": {}}"#, &DecodeOptions::default())
			.expect("message decodes");

		assert_eq!(
			message_to_json(&pool, &msg),
			serde_json::json!({ "displayName": "a", "colors": ["BLUE", "RED"], "child": {} })
		);
	}

	#[test]
	fn text_render_truncates_long_strings() {
		let pool = test_pool();
		let msg = decode_json(&pool, "pkg.Msg", r#"{"display_name": "abcdef"}"#, &DecodeOptions::default()).expect("message decodes");
		let options = PrintOptions {
			max_string_len: 3,
			..PrintOptions::default()
		};

		let text = render_message(&pool, &msg, options).to_string();
		assert!(text.starts_with("pkg.Msg {"), "unexpected render: {text}");
		assert!(text.contains("display_name = \"abc...\""), "unexpected render: {text}");
	}

	#[test]
	fn text_render_stops_at_print_depth() {
		let pool = test_pool();
		let msg = decode_json(&pool, "pkg.Msg", r#"{"child": {"child": {"display_name": "deep"}}}"#, &DecodeOptions::default()).expect("message decodes");
		let options = PrintOptions {
			max_print_depth: 2,
			..PrintOptions::default()
		};

		let text = render_message(&pool, &msg, options).to_string();
		assert!(text.contains("child = pkg.Msg { ... }"), "unexpected render: {text}");
		assert!(!text.contains("deep"), "unexpected render: {text}");
	}
}
