use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors produced while loading schemas and decoding Avro JSON values.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Input or schema text was not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Value shape does not match what the field or role expects.
	#[error("expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected shape or Avro role.
		expected: String,
		/// Avro type name of the value actually received.
		got: &'static str,
	},
	/// Input map key matched no field and no ignored extra field.
	#[error("unexpected field {name}")]
	UnknownField {
		/// Offending input key.
		name: String,
	},
	/// Schema declares a kind the decoder has no rule for in this position.
	#[error("unexpected kind {kind}")]
	UnsupportedKind {
		/// Kind tag as written in schemas.
		kind: String,
	},
	/// Coercion failure localized to one field.
	#[error("field {field}: {source}")]
	Field {
		/// Declared field name.
		field: String,
		/// Underlying failure.
		#[source]
		source: Box<DecodeError>,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Requested message type is not in the descriptor pool.
	#[error("message type not found: {name}")]
	MessageNotFound {
		/// Requested fully-qualified name.
		name: String,
	},
	/// Well-known type payload could not be decoded.
	#[error("{type_name}: {reason}")]
	WellKnown {
		/// Fully-qualified well-known type name.
		type_name: String,
		/// Failure detail.
		reason: String,
	},
	/// Schema definition is inconsistent.
	#[error("invalid schema: {reason}")]
	Schema {
		/// Failure detail.
		reason: String,
	},
}

impl DecodeError {
	pub(crate) fn type_mismatch(expected: impl Into<String>, got: &'static str) -> Self {
		Self::TypeMismatch {
			expected: expected.into(),
			got,
		}
	}

	pub(crate) fn in_field(self, field: &str) -> Self {
		Self::Field {
			field: field.to_owned(),
			source: Box::new(self),
		}
	}

	pub(crate) fn schema(reason: impl Into<String>) -> Self {
		Self::Schema { reason: reason.into() }
	}
}
