//! Record formats: the token grammar of one record type.
//!
//! A record format is built from a spec string of space-separated items.
//! `{field}` and `{field:template}` items are field slots; anything else is
//! a literal token, and exactly one literal, marked with a trailing `*`, is
//! the discriminating key that identifies the record type during dispatch.

use std::sync::Arc;

use fieldlog_model::{Record, RecordType, Value};

use crate::error::FormatError;
use crate::field_format::{FieldFormat, Mode};
use crate::registry::FieldFormatRegistry;
use crate::token::tokenize;

#[derive(Debug, Clone)]
pub enum FormatItem {
    Literal {
        text: String,
        is_key: bool,
    },
    Field {
        name: String,
        slot: usize,
        format: FieldFormat,
    },
}

#[derive(Debug, Clone)]
pub struct RecordFormat {
    record_type: Arc<RecordType>,
    spec: String,
    items: Vec<FormatItem>,
    key_index: usize,
    field_order: Vec<String>,
}

impl RecordFormat {
    /// Build a record format from a spec string. Malformed items, unknown
    /// fields, a missing or duplicated key, and unresolvable field formats
    /// are all construction-time errors.
    pub fn from_spec(
        spec: &str,
        record_type: &Arc<RecordType>,
        registry: &FieldFormatRegistry,
    ) -> Result<RecordFormat, FormatError> {
        let mut items = Vec::new();
        for raw in spec.split_whitespace() {
            items.push(parse_item(raw, spec, record_type, registry)?);
        }

        let mut key_indices = items.iter().enumerate().filter_map(|(index, item)| {
            matches!(item, FormatItem::Literal { is_key: true, .. }).then_some(index)
        });
        let key_index = key_indices.next().ok_or_else(|| FormatError::MissingKey {
            spec: spec.to_string(),
        })?;
        if key_indices.next().is_some() {
            return Err(FormatError::ExtraKey {
                spec: spec.to_string(),
            });
        }

        let field_order = items
            .iter()
            .filter_map(|item| match item {
                FormatItem::Field { name, .. } => Some(name.clone()),
                FormatItem::Literal { .. } => None,
            })
            .collect();

        Ok(RecordFormat {
            record_type: Arc::clone(record_type),
            spec: spec.to_string(),
            items,
            key_index,
            field_order,
        })
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// Token position of the discriminating key.
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Text of the discriminating key literal.
    pub fn key(&self) -> &str {
        match &self.items[self.key_index] {
            FormatItem::Literal { text, .. } => text,
            // The key index always points at a literal by construction.
            FormatItem::Field { name, .. } => name,
        }
    }

    /// Field names in the order they appear in the grammar line. Editing
    /// UIs visit fields in this order.
    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    /// The codec for one field of this format.
    pub fn field_format(&self, field: &str) -> Option<&FieldFormat> {
        self.items.iter().find_map(|item| match item {
            FormatItem::Field { name, format, .. } if name == field => Some(format),
            _ => None,
        })
    }

    /// Format one field of a record in the given mode.
    pub fn format_field(&self, record: &Record, field: &str, mode: Mode) -> Result<String, FormatError> {
        let format = self
            .field_format(field)
            .ok_or_else(|| FormatError::from(fieldlog_model::ModelError::UnknownField {
                record_type: self.record_type.name().to_string(),
                field: field.to_string(),
            }))?;
        Ok(format.format(record.get(field)?, mode))
    }

    /// Format a whole record as one grammar line (display mode).
    pub fn format_record(&self, record: &Record) -> Result<String, FormatError> {
        if record.type_name() != self.record_type.name() {
            return Err(FormatError::WrongRecordType {
                expected: self.record_type.name().to_string(),
                actual: record.type_name().to_string(),
            });
        }
        let mut parts = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                FormatItem::Literal { text, .. } => parts.push(text.clone()),
                FormatItem::Field { slot, format, .. } => {
                    parts.push(format.format(record.value_at(*slot), Mode::Display));
                }
            }
        }
        Ok(parts.join(" "))
    }

    pub fn parse_line(&self, line: &str) -> Result<Record, FormatError> {
        let tokens = tokenize(line)?;
        self.parse_tokens(&tokens, line)
    }

    /// Parse a token sequence against this format. The token count must
    /// match the item count, literals must match exactly, and every field
    /// token must parse with its codec; the record is assembled and
    /// validated atomically at the end.
    pub fn parse_tokens(&self, tokens: &[String], line: &str) -> Result<Record, FormatError> {
        if tokens.len() != self.items.len() {
            return Err(FormatError::TokenCount {
                line: line.to_string(),
                record_type: self.record_type.name().to_string(),
                expected: self.items.len(),
                actual: tokens.len(),
            });
        }

        let mut values: Vec<(String, Option<Value>)> = Vec::with_capacity(self.field_order.len());
        for (token, item) in tokens.iter().zip(&self.items) {
            match item {
                FormatItem::Literal { text, .. } => {
                    if token != text {
                        return Err(FormatError::BadLiteral {
                            token: token.clone(),
                            expected: text.clone(),
                        });
                    }
                }
                FormatItem::Field { name, format, .. } => {
                    let value = format
                        .parse(token, Mode::Display)
                        .map_err(|e| e.in_field(name))?;
                    values.push((name.clone(), value));
                }
            }
        }

        Record::new(&self.record_type, values).map_err(FormatError::from)
    }
}

fn parse_item(
    raw: &str,
    spec: &str,
    record_type: &Arc<RecordType>,
    registry: &FieldFormatRegistry,
) -> Result<FormatItem, FormatError> {
    if !raw.starts_with('{') {
        let (text, is_key) = match raw.strip_suffix('*') {
            Some(text) => (text, true),
            None => (raw, false),
        };
        return Ok(FormatItem::Literal {
            text: text.to_string(),
            is_key,
        });
    }

    let bad_item = |message: String| FormatError::BadSpecItem {
        item: raw.to_string(),
        spec: spec.to_string(),
        message,
    };

    let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Err(bad_item(
            "field placeholder must start with \"{\" and end with \"}\"".to_string(),
        ));
    };
    let (name, extra) = match inner.split_once(':') {
        Some((name, extra)) => (name, Some(extra)),
        None => (inner, None),
    };

    let Some(slot) = record_type.slot(name) else {
        return Err(bad_item(format!(
            "record type \"{}\" has no field \"{name}\"",
            record_type.name()
        )));
    };
    let field_type = &record_type.fields()[slot].1;
    let format = registry
        .resolve(field_type, extra)
        .map_err(|e| bad_item(e.to_string()))?;

    Ok(FormatItem::Field {
        name: name.to_string(),
        slot,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldlog_model::{FieldType, Schema};

    fn record_type() -> Arc<RecordType> {
        let layer = Schema::new([
            ("f", FieldType::float().default(1.23).build().expect("field")),
            ("i", FieldType::integer().default(2).build().expect("field")),
            ("s", FieldType::string().default("Hello").build().expect("field")),
        ]);
        Arc::new(RecordType::compose("Obs", &[&layer]).expect("compose"))
    }

    fn build(spec: &str) -> Result<RecordFormat, FormatError> {
        RecordFormat::from_spec(spec, &record_type(), &FieldFormatRegistry::default())
    }

    #[test]
    fn format_records_with_defaults() {
        let rt = record_type();
        let record = Record::new(&rt, std::iter::empty::<(&str, Option<Value>)>())
            .expect("record");

        let cases = [
            ("float* {f} integer {i} string {s}", 0, "float 1.23 integer 2 string Hello"),
            ("integer {i} float* {f}", 2, "integer 2 float 1.23"),
            ("one two {i:05} three* {f:.3f}", 3, "one two 00002 three 1.230"),
        ];
        for (spec, key_index, formatted) in cases {
            let format = build(spec).expect("format");
            assert_eq!(format.key_index(), key_index, "{spec}");
            assert_eq!(format.format_record(&record).expect("format"), formatted);
        }
    }

    #[test]
    fn construction_errors() {
        for spec in ["{f]", "{{f}", "float {f}"] {
            assert!(build(spec).is_err(), "{spec}");
        }
        assert!(matches!(
            build("float {f}"),
            Err(FormatError::MissingKey { .. })
        ));
        assert!(matches!(
            build("a* b* {f}"),
            Err(FormatError::ExtraKey { .. })
        ));
        assert!(matches!(
            build("key* {nope}"),
            Err(FormatError::BadSpecItem { .. })
        ));
        assert!(matches!(
            build("key* {s:05}"),
            Err(FormatError::BadSpecItem { .. })
        ));
    }

    #[test]
    fn parse_line_assembles_a_record() {
        let format = build("float* {f} integer {i} string {s}").expect("format");
        let record = format
            .parse_line("float 1.23 integer 2 string \"Hello\"")
            .expect("parse");
        assert_eq!(record.get("f").expect("get"), Some(&Value::Float(1.23)));
        assert_eq!(record.get("i").expect("get"), Some(&Value::Int(2)));
        assert_eq!(
            record.get("s").expect("get"),
            Some(&Value::Str("Hello".to_string()))
        );
    }

    #[test]
    fn wrong_token_count_names_expected_and_actual() {
        let format = build("float* {f} integer {i} string {s}").expect("format");
        let err = format.parse_line("float 1.23").expect_err("count");
        match err {
            FormatError::TokenCount { expected, actual, .. } => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn field_parse_errors_name_the_field() {
        let format = build("float* {f} integer {i} string {s}").expect("format");
        let err = format
            .parse_line("float bobo integer 2 string x")
            .expect_err("bad float");
        assert!(matches!(err, FormatError::Field { ref field, .. } if field == "f"), "{err}");
    }

    #[test]
    fn literal_mismatch_fails() {
        let format = build("float* {f} integer {i} string {s}").expect("format");
        let err = format
            .parse_line("float 1.0 int 2 string x")
            .expect_err("bad literal");
        assert!(matches!(err, FormatError::BadLiteral { .. }), "{err}");
    }

    #[test]
    fn field_order_follows_the_grammar_line() {
        let format = build("one two {i:05} three* {f:.3f}").expect("format");
        assert_eq!(format.field_order(), ["i", "f"]);
        assert!(format.field_format("i").is_some());
        assert!(format.field_format("x").is_none());
    }

    #[test]
    fn single_fields_format_in_both_modes() {
        let rt = record_type();
        let format = RecordFormat::from_spec(
            "float* {f} integer {i} string {s}",
            &rt,
            &FieldFormatRegistry::default(),
        )
        .expect("format");
        let record = Record::new(&rt, [("s", Some(Value::Str("a b".to_string())))])
            .expect("record");
        assert_eq!(
            format.format_field(&record, "i", Mode::Display).expect("format"),
            "2"
        );
        assert_eq!(
            format.format_field(&record, "s", Mode::Display).expect("format"),
            "\"a b\""
        );
        assert_eq!(
            format.format_field(&record, "s", Mode::Editing).expect("format"),
            "a b"
        );
        assert!(format.format_field(&record, "x", Mode::Display).is_err());
    }

    #[test]
    fn format_rejects_records_of_another_type() {
        let format = build("float* {f} integer {i} string {s}").expect("format");
        let other_layer = Schema::new([("f", FieldType::float().build().expect("field"))]);
        let other = Arc::new(RecordType::compose("Other", &[&other_layer]).expect("compose"));
        let record = Record::new(&other, std::iter::empty::<(&str, Option<Value>)>())
            .expect("record");
        assert!(matches!(
            format.format_record(&record),
            Err(FormatError::WrongRecordType { .. })
        ));
    }
}
