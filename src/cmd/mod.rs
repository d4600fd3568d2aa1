/// Avro JSON decode command.
pub mod decode;
/// Decoded message rendering.
pub mod print;
/// Schema inspection command.
pub mod schema;
/// Shared CLI helpers.
pub mod util;
