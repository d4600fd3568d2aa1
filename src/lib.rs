//! Decode Avro JSON value trees into protobuf-style messages described by a runtime schema.

/// Avro JSON datums, schema descriptors, and the schema-directed decoder.
pub mod avro;
