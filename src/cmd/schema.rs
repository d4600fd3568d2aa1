use std::path::PathBuf;

use protoavro::avro::{Cardinality, DecodeError, DescriptorPool, FieldDescriptor, Kind, MessageDescriptor, Result};

/// Print pool statistics, or the fields of one message.
pub fn run(path: PathBuf, message: Option<String>) -> Result<()> {
	let pool = DescriptorPool::open(&path)?;

	println!("path: {}", path.display());
	println!("messages: {}", pool.messages.len());
	println!("enums: {}", pool.enums.len());

	let Some(name) = message else {
		for item in &pool.messages {
			println!("  message {} ({} fields)", item.full_name, item.fields.len());
		}
		for item in &pool.enums {
			println!("  enum {} ({} values)", item.full_name, item.values.len());
		}
		return Ok(());
	};

	let item = pool.message_by_name(&name).ok_or(DecodeError::MessageNotFound { name })?;
	print_message(&pool, item);
	Ok(())
}

fn print_message(pool: &DescriptorPool, item: &MessageDescriptor) {
	println!("message: {}", item.full_name);
	println!("field_count: {}", item.fields.len());
	for field in &item.fields {
		println!("  {} {} = {} (json: {})", field_type(pool, field), field.name, field.number, field.json_name);
	}
}

fn field_type(pool: &DescriptorPool, field: &FieldDescriptor) -> String {
	let kind = kind_label(pool, field.kind);
	match field.cardinality {
		Cardinality::Singular => kind,
		Cardinality::List => format!("repeated {kind}"),
		Cardinality::Map { key } => format!("map<{key}, {kind}>"),
	}
}

fn kind_label(pool: &DescriptorPool, kind: Kind) -> String {
	match kind {
		Kind::Enum(idx) => pool.enum_(idx).full_name.to_string(),
		Kind::Message(idx) | Kind::Group(idx) => pool.message(idx).full_name.to_string(),
		scalar => scalar.tag().to_owned(),
	}
}
