use serde::Serialize;

use protoavro::avro::Result;

/// Print a JSON payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Render bytes the way Avro JSON writes them: one code point per byte.
pub(crate) fn bytes_to_avro_string(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| char::from(*byte)).collect()
}
