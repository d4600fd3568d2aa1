use crate::avro::{DecodeOptions, FieldDescriptor, MessageDescriptor};

/// Outcome of matching an input key against a message's fields.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
	/// Key names this field.
	Field(&'a FieldDescriptor),
	/// Key is a configured extra field; its value is dropped.
	Ignored,
	/// Key matches nothing.
	NotFound,
}

/// Match `name` by JSON name, then by declared name, then against the extra-field list.
pub fn resolve_field<'a>(desc: &'a MessageDescriptor, name: &str, opt: &DecodeOptions) -> Resolved<'a> {
	if let Some(field) = desc.field_by_json_name(name) {
		return Resolved::Field(field);
	}
	if let Some(field) = desc.field_by_text_name(name) {
		return Resolved::Field(field);
	}
	if opt.extra_fields.iter().any(|extra| extra.field_name == name) {
		return Resolved::Ignored;
	}
	Resolved::NotFound
}

#[cfg(test)]
mod tests {
	use super::{Resolved, resolve_field};
	use crate::avro::{Cardinality, DecodeOptions, FieldDescriptor, Kind, MessageDescriptor};

	fn test_message() -> MessageDescriptor {
		MessageDescriptor {
			full_name: "pkg.Msg".into(),
			fields: vec![
				FieldDescriptor {
					name: "display_name".into(),
					json_name: "displayName".into(),
					number: 1,
					kind: Kind::String,
					cardinality: Cardinality::Singular,
				},
				FieldDescriptor {
					name: "count".into(),
					json_name: "count".into(),
					number: 2,
					kind: Kind::Int32,
					cardinality: Cardinality::Singular,
				},
			],
		}
	}

	#[test]
	fn json_and_text_names_resolve_to_same_field() {
		let desc = test_message();
		let opt = DecodeOptions::default();

		let Resolved::Field(by_json) = resolve_field(&desc, "displayName", &opt) else {
			panic!("json name should resolve");
		};
		let Resolved::Field(by_text) = resolve_field(&desc, "display_name", &opt) else {
			panic!("text name should resolve");
		};
		assert_eq!(by_json.number, 1);
		assert_eq!(by_text.number, 1);
	}

	#[test]
	fn extra_field_is_ignored_not_missing() {
		let desc = test_message();
		let opt = DecodeOptions::with_extra_fields(["ingested_at"]);

		assert!(matches!(resolve_field(&desc, "ingested_at", &opt), Resolved::Ignored));
		assert!(matches!(resolve_field(&desc, "bogus", &opt), Resolved::NotFound));
	}

	#[test]
	fn schema_field_wins_over_extra_field() {
		let desc = test_message();
		let opt = DecodeOptions::with_extra_fields(["count"]);

		assert!(matches!(resolve_field(&desc, "count", &opt), Resolved::Field(field) if field.number == 2));
	}
}
