use std::fs;
use std::path::PathBuf;

use protoavro::avro::{DecodeOptions, Datum, DescriptorPool, ExtraField, Result, decode_message};

use crate::cmd::print::{PrintOptions, message_to_json, render_message};
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// JSON schema definition.
	pub schema: PathBuf,
	/// Avro JSON input value.
	pub input: PathBuf,
	/// Fully-qualified message type to decode into.
	#[arg(long)]
	pub message: String,
	/// Input key to accept and drop; repeatable.
	#[arg(long = "extra-field")]
	pub extra_fields: Vec<String>,
	/// Maximum nested message depth, union unwraps included.
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	/// Emit JSON instead of a text tree.
	#[arg(long)]
	pub json: bool,
}

/// Decode one Avro JSON value and print the resulting message.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		input,
		message,
		extra_fields,
		max_depth,
		json,
	} = args;

	let pool = DescriptorPool::open(&schema)?;
	let datum = Datum::from_json_slice(&fs::read(&input)?)?;

	let mut options = DecodeOptions {
		extra_fields: extra_fields.into_iter().map(|field_name| ExtraField { field_name }).collect(),
		..DecodeOptions::default()
	};
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}

	let decoded = decode_message(&pool, &message, &datum, &options)?;

	if json {
		return emit_json(&DecodeJson {
			input: input.display().to_string(),
			message,
			fields: decoded.len(),
			value: message_to_json(&pool, &decoded),
		});
	}

	println!("input: {}", input.display());
	println!("message: {message}");
	println!("fields: {}", decoded.len());
	println!("decoded:");
	print!("{}", render_message(&pool, &decoded, PrintOptions::default()));
	Ok(())
}

#[derive(serde::Serialize)]
struct DecodeJson {
	input: String,
	message: String,
	fields: usize,
	value: serde_json::Value,
}
