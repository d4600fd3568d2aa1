use std::collections::BTreeMap;

use crate::avro::Result;

/// Schema-less Avro JSON value tree, the decoder's only input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
	/// Avro `null`.
	Null,
	/// Avro `boolean`.
	Boolean(bool),
	/// Avro `int`.
	Int(i32),
	/// Avro `long`.
	Long(i64),
	/// Avro `float`.
	Float(f32),
	/// Avro `double`.
	Double(f64),
	/// Avro `string`.
	String(String),
	/// Avro `bytes`.
	Bytes(Vec<u8>),
	/// Avro `array`.
	Array(Vec<Datum>),
	/// Avro `map` or `record`.
	Map(BTreeMap<String, Datum>),
}

impl Datum {
	/// Avro type name describing this value's shape.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Datum::Null => "null",
			Datum::Boolean(_) => "boolean",
			Datum::Int(_) => "int",
			Datum::Long(_) => "long",
			Datum::Float(_) => "float",
			Datum::Double(_) => "double",
			Datum::String(_) => "string",
			Datum::Bytes(_) => "bytes",
			Datum::Array(_) => "array",
			Datum::Map(_) => "map",
		}
	}

	/// Whether this value is Avro `null`.
	pub fn is_null(&self) -> bool {
		matches!(self, Datum::Null)
	}

	/// Borrow the entries when this value is map-shaped.
	pub fn as_map(&self) -> Option<&BTreeMap<String, Datum>> {
		match self {
			Datum::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Build a map value from key/value pairs.
	pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Datum)>) -> Self {
		Datum::Map(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
	}

	/// Build a single-key union value `{branch: value}`.
	pub fn union(branch: impl Into<String>, value: Datum) -> Self {
		Datum::map([(branch.into(), value)])
	}

	/// Parse Avro JSON text into a value tree.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let json: serde_json::Value = serde_json::from_str(text)?;
		Ok(Self::from(json))
	}

	/// Parse Avro JSON bytes into a value tree.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		let json: serde_json::Value = serde_json::from_slice(bytes)?;
		Ok(Self::from(json))
	}
}

impl From<serde_json::Value> for Datum {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Datum::Null,
			serde_json::Value::Bool(v) => Datum::Boolean(v),
			serde_json::Value::Number(number) => {
				if let Some(v) = number.as_i64() {
					Datum::Long(v)
				} else if let Some(v) = number.as_u64() {
					Datum::Long(v as i64)
				} else {
					Datum::Double(number.as_f64().unwrap_or(f64::NAN))
				}
			}
			serde_json::Value::String(v) => Datum::String(v),
			serde_json::Value::Array(items) => Datum::Array(items.into_iter().map(Datum::from).collect()),
			serde_json::Value::Object(entries) => Datum::Map(entries.into_iter().map(|(key, value)| (key, Datum::from(value))).collect()),
		}
	}
}

impl From<bool> for Datum {
	fn from(value: bool) -> Self {
		Datum::Boolean(value)
	}
}

impl From<i32> for Datum {
	fn from(value: i32) -> Self {
		Datum::Int(value)
	}
}

impl From<i64> for Datum {
	fn from(value: i64) -> Self {
		Datum::Long(value)
	}
}

impl From<f32> for Datum {
	fn from(value: f32) -> Self {
		Datum::Float(value)
	}
}

impl From<f64> for Datum {
	fn from(value: f64) -> Self {
		Datum::Double(value)
	}
}

impl From<&str> for Datum {
	fn from(value: &str) -> Self {
		Datum::String(value.to_owned())
	}
}

impl From<String> for Datum {
	fn from(value: String) -> Self {
		Datum::String(value)
	}
}

impl From<Vec<u8>> for Datum {
	fn from(value: Vec<u8>) -> Self {
		Datum::Bytes(value)
	}
}

impl From<Vec<Datum>> for Datum {
	fn from(value: Vec<Datum>) -> Self {
		Datum::Array(value)
	}
}

#[cfg(test)]
mod tests {
	use super::Datum;

	#[test]
	fn json_integers_become_long_and_fractions_double() {
		let datum = Datum::from_json_str(r#"{"a": 1, "b": 1.5, "c": 18446744073709551615}"#).expect("json parses");
		let map = datum.as_map().expect("object becomes map");

		assert_eq!(map["a"], Datum::Long(1));
		assert_eq!(map["b"], Datum::Double(1.5));
		assert_eq!(map["c"], Datum::Long(-1));
	}

	#[test]
	fn json_null_and_arrays_are_preserved() {
		let datum = Datum::from_json_str(r#"[null, "x", true]"#).expect("json parses");
		assert_eq!(datum, Datum::Array(vec![Datum::Null, Datum::from("x"), Datum::Boolean(true)]));
	}

	#[test]
	fn invalid_json_is_an_error() {
		assert!(Datum::from_json_str("{").is_err());
	}
}
