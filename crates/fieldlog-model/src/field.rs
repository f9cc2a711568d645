//! Field types: the per-field validation, default, and range contract.
//!
//! A `FieldType` is immutable once built. Construction type-checks and
//! range-checks every declared option (including the default value), so a
//! bad declaration fails at schema-definition time rather than on first use.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::value::{Value, is_decimal_literal};

/// Static taxonomy of field value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Decimal,
    Date,
    Time,
}

impl FieldKind {
    /// Short lowercase type name, e.g. `"string"` or `"decimal"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Decimal => "decimal",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
        }
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    None,
    StringSet {
        /// Declaration order, used for the derived range description.
        values: Vec<String>,
        members: BTreeSet<String>,
    },
    IntBounds {
        min: Option<i64>,
        max: Option<i64>,
    },
    FloatBounds {
        min: Option<f64>,
        max: Option<f64>,
        min_inclusive: bool,
        max_inclusive: bool,
    },
    DecimalBounds {
        /// Bounds keep their literal text for messages; comparison uses the
        /// parsed floats.
        min: Option<String>,
        max: Option<String>,
        min_float: Option<f64>,
        max_float: Option<f64>,
        min_inclusive: bool,
        max_inclusive: bool,
    },
}

/// Validation unit for one field: type tag plus optional range, enumeration,
/// translation, units, documentation, and default value.
#[derive(Debug, Clone)]
pub struct FieldType {
    kind: FieldKind,
    category: Option<String>,
    units: Option<String>,
    range_text: Option<String>,
    doc: Option<String>,
    default: Option<Value>,
    constraint: Constraint,
    translations: BTreeMap<String, String>,
}

impl FieldType {
    pub fn builder(kind: FieldKind) -> FieldTypeBuilder {
        FieldTypeBuilder {
            kind,
            category: None,
            units: None,
            range_text: None,
            doc: None,
            default: None,
            values: None,
            translations: BTreeMap::new(),
            min: None,
            max: None,
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    pub fn string() -> FieldTypeBuilder {
        Self::builder(FieldKind::String)
    }

    pub fn integer() -> FieldTypeBuilder {
        Self::builder(FieldKind::Integer)
    }

    pub fn float() -> FieldTypeBuilder {
        Self::builder(FieldKind::Float)
    }

    pub fn decimal() -> FieldTypeBuilder {
        Self::builder(FieldKind::Decimal)
    }

    pub fn date() -> FieldTypeBuilder {
        Self::builder(FieldKind::Date)
    }

    pub fn time() -> FieldTypeBuilder {
        Self::builder(FieldKind::Time)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Refinement tag consulted by format registries before the kind
    /// default, e.g. `"angle"` on a float field rendered sexagesimally.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Human-readable range description: the explicit text when one was
    /// declared, otherwise derived from the value set or bounds.
    pub fn range(&self) -> Option<&str> {
        self.range_text.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Enumerated allowed values, in declaration order, for string fields.
    pub fn values(&self) -> Option<&[String]> {
        match &self.constraint {
            Constraint::StringSet { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Apply the value translations and numeric promotions that precede
    /// validation: a string alias becomes its canonical value, an integer
    /// assigned to a float field becomes a float.
    pub fn normalize(&self, value: Value) -> Value {
        match (self.kind, value) {
            (FieldKind::Float, Value::Int(i)) => Value::Float(i as f64),
            (FieldKind::String, Value::Str(s)) => match self.translations.get(&s) {
                Some(canonical) => Value::Str(canonical.clone()),
                None => Value::Str(s),
            },
            (_, value) => value,
        }
    }

    /// Check a (non-null) value against this field type. Type mismatches are
    /// type errors; enumeration and bound violations are range errors.
    pub fn validate(&self, value: &Value) -> Result<(), ModelError> {
        self.check_type(value)?;
        self.check_range(value, "")
    }

    fn check_type(&self, value: &Value) -> Result<(), ModelError> {
        let ok = match (self.kind, value) {
            (FieldKind::String, Value::Str(_)) => true,
            (FieldKind::Integer, Value::Int(_)) => true,
            (FieldKind::Float, Value::Float(_) | Value::Int(_)) => true,
            (FieldKind::Decimal, Value::Decimal(s)) => {
                if !is_decimal_literal(s) {
                    return Err(ModelError::Type(format!(
                        "decimal field value \"{s}\" is not a decimal number string"
                    )));
                }
                true
            }
            (FieldKind::Date, Value::Date(_)) => true,
            (FieldKind::Time, Value::Time(_)) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(ModelError::Type(format!(
                "{} field value must be {} or null, but found {}",
                self.kind.type_name(),
                accepted_types(self.kind),
                value.type_name()
            )))
        }
    }

    fn check_range(&self, value: &Value, description: &str) -> Result<(), ModelError> {
        match &self.constraint {
            Constraint::None => Ok(()),
            Constraint::StringSet { values, members } => {
                let Value::Str(s) = value else {
                    return Ok(());
                };
                if members.contains(s) {
                    Ok(())
                } else {
                    Err(ModelError::Range(format!(
                        "bad string field {description}value {}: value must be in the set {}",
                        quote(s),
                        format_string_set(values)
                    )))
                }
            }
            Constraint::IntBounds { min, max } => {
                let Some(v) = value.as_int() else {
                    return Ok(());
                };
                if let Some(min) = min
                    && v < *min
                {
                    return Err(ModelError::Range(format!(
                        "integer field value {v} is less than minimum allowed value of {min}"
                    )));
                }
                if let Some(max) = max
                    && v > *max
                {
                    return Err(ModelError::Range(format!(
                        "integer field value {v} is greater than maximum allowed value of {max}"
                    )));
                }
                Ok(())
            }
            Constraint::FloatBounds {
                min,
                max,
                min_inclusive,
                max_inclusive,
            } => {
                let Some(v) = value.as_float() else {
                    return Ok(());
                };
                check_float_bounds(
                    "float",
                    &v.to_string(),
                    v,
                    min.map(|m| (m.to_string(), m)),
                    max.map(|m| (m.to_string(), m)),
                    *min_inclusive,
                    *max_inclusive,
                )
            }
            Constraint::DecimalBounds {
                min,
                max,
                min_float,
                max_float,
                min_inclusive,
                max_inclusive,
            } => {
                let Value::Decimal(text) = value else {
                    return Ok(());
                };
                let v: f64 = text.parse().map_err(|_| {
                    ModelError::Type(format!(
                        "decimal field value \"{text}\" is not a decimal number string"
                    ))
                })?;
                check_float_bounds(
                    "decimal",
                    text,
                    v,
                    min_float.map(|m| (min.clone().unwrap_or_default(), m)),
                    max_float.map(|m| (max.clone().unwrap_or_default(), m)),
                    *min_inclusive,
                    *max_inclusive,
                )
            }
        }
    }
}

fn check_float_bounds(
    kind: &str,
    text: &str,
    v: f64,
    min: Option<(String, f64)>,
    max: Option<(String, f64)>,
    min_inclusive: bool,
    max_inclusive: bool,
) -> Result<(), ModelError> {
    if let Some((min_text, min)) = min {
        if min_inclusive {
            if v < min {
                return Err(ModelError::Range(format!(
                    "{kind} field value {text} is less than minimum allowed value of {min_text}"
                )));
            }
        } else if v <= min {
            return Err(ModelError::Range(format!(
                "{kind} field value {text} is not greater than lower bound of {min_text}"
            )));
        }
    }
    if let Some((max_text, max)) = max {
        if max_inclusive {
            if v > max {
                return Err(ModelError::Range(format!(
                    "{kind} field value {text} is greater than maximum allowed value of {max_text}"
                )));
            }
        } else if v >= max {
            return Err(ModelError::Range(format!(
                "{kind} field value {text} is not less than upper bound of {max_text}"
            )));
        }
    }
    Ok(())
}

fn accepted_types(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "a string",
        FieldKind::Integer => "an integer",
        FieldKind::Float => "a float or an integer",
        FieldKind::Decimal => "a decimal number string",
        FieldKind::Date => "a date",
        FieldKind::Time => "a time",
    }
}

/// Builder for [`FieldType`]. `build` validates every option against the
/// field kind and fails with a type or range error on a bad declaration.
#[derive(Debug, Clone)]
pub struct FieldTypeBuilder {
    kind: FieldKind,
    category: Option<String>,
    units: Option<String>,
    range_text: Option<String>,
    doc: Option<String>,
    default: Option<Value>,
    values: Option<Vec<String>>,
    translations: BTreeMap<String, String>,
    min: Option<Value>,
    max: Option<Value>,
    min_inclusive: bool,
    max_inclusive: bool,
}

impl FieldTypeBuilder {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn range_text(mut self, range: impl Into<String>) -> Self {
        self.range_text = Some(range.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Enumerated allowed values (string fields only).
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Alias-to-canonical translations applied before validation (string
    /// fields only). Every target must belong to the value set, if any.
    pub fn translations<I, A, B>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.translations = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.into(), canonical.into()))
            .collect();
        self
    }

    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self.min_inclusive = true;
        self
    }

    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self.max_inclusive = true;
        self
    }

    pub fn min_exclusive(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self.min_inclusive = false;
        self
    }

    pub fn max_exclusive(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self.max_inclusive = false;
        self
    }

    pub fn build(self) -> Result<FieldType, ModelError> {
        let constraint = self.build_constraint()?;
        let range_text = match self.range_text {
            Some(text) => Some(text),
            None => derive_range_text(&constraint),
        };
        let mut field_type = FieldType {
            kind: self.kind,
            category: self.category,
            units: self.units,
            range_text,
            doc: self.doc,
            default: None,
            constraint,
            translations: BTreeMap::new(),
        };

        // Translation targets must themselves be valid values.
        if !self.translations.is_empty() {
            if self.kind != FieldKind::String {
                return Err(ModelError::Declaration(format!(
                    "translations are only supported for string fields, not {}",
                    self.kind.type_name()
                )));
            }
            for canonical in self.translations.values() {
                field_type.check_range(&Value::Str(canonical.clone()), "translation ")?;
            }
        }
        field_type.translations = self.translations;

        // The default, if any, must pass the field's own validation.
        if let Some(default) = self.default {
            let default = field_type.normalize(default);
            field_type.check_type(&default)?;
            field_type.check_range(&default, "default ")?;
            field_type.default = Some(default);
        }

        Ok(field_type)
    }

    fn build_constraint(&self) -> Result<Constraint, ModelError> {
        match self.kind {
            FieldKind::String => {
                self.reject_bounds()?;
                match &self.values {
                    Some(values) => Ok(Constraint::StringSet {
                        values: values.clone(),
                        members: values.iter().cloned().collect(),
                    }),
                    None => Ok(Constraint::None),
                }
            }
            FieldKind::Integer => {
                self.reject_values()?;
                if !self.min_inclusive || !self.max_inclusive {
                    return Err(ModelError::Declaration(
                        "integer field bounds are always inclusive".to_string(),
                    ));
                }
                let min = self.bound_int(self.min.as_ref(), "min")?;
                let max = self.bound_int(self.max.as_ref(), "max")?;
                Ok(Constraint::IntBounds { min, max })
            }
            FieldKind::Float => {
                self.reject_values()?;
                let min = self.bound_float(self.min.as_ref(), "min")?;
                let max = self.bound_float(self.max.as_ref(), "max")?;
                Ok(Constraint::FloatBounds {
                    min,
                    max,
                    min_inclusive: self.min_inclusive,
                    max_inclusive: self.max_inclusive,
                })
            }
            FieldKind::Decimal => {
                self.reject_values()?;
                let min = self.bound_decimal(self.min.as_ref(), "min")?;
                let max = self.bound_decimal(self.max.as_ref(), "max")?;
                let min_float = parse_bound(&min);
                let max_float = parse_bound(&max);
                Ok(Constraint::DecimalBounds {
                    min,
                    max,
                    min_float,
                    max_float,
                    min_inclusive: self.min_inclusive,
                    max_inclusive: self.max_inclusive,
                })
            }
            FieldKind::Date | FieldKind::Time => {
                self.reject_values()?;
                self.reject_bounds()?;
                Ok(Constraint::None)
            }
        }
    }

    fn reject_values(&self) -> Result<(), ModelError> {
        if self.values.is_some() {
            return Err(ModelError::Declaration(format!(
                "a value set is only supported for string fields, not {}",
                self.kind.type_name()
            )));
        }
        Ok(())
    }

    fn reject_bounds(&self) -> Result<(), ModelError> {
        if self.min.is_some() || self.max.is_some() {
            return Err(ModelError::Declaration(format!(
                "min/max bounds are not supported for {} fields",
                self.kind.type_name()
            )));
        }
        Ok(())
    }

    fn bound_int(&self, bound: Option<&Value>, which: &str) -> Result<Option<i64>, ModelError> {
        match bound {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(ModelError::Type(format!(
                "integer field {which} bound must be an integer, but found {}",
                other.type_name()
            ))),
        }
    }

    fn bound_float(&self, bound: Option<&Value>, which: &str) -> Result<Option<f64>, ModelError> {
        match bound {
            None => Ok(None),
            Some(Value::Float(v)) => Ok(Some(*v)),
            Some(Value::Int(i)) => Ok(Some(*i as f64)),
            Some(other) => Err(ModelError::Type(format!(
                "float field {which} bound must be a float or an integer, but found {}",
                other.type_name()
            ))),
        }
    }

    fn bound_decimal(
        &self,
        bound: Option<&Value>,
        which: &str,
    ) -> Result<Option<String>, ModelError> {
        match bound {
            None => Ok(None),
            Some(Value::Decimal(s) | Value::Str(s)) if is_decimal_literal(s) => Ok(Some(s.clone())),
            Some(other) => Err(ModelError::Type(format!(
                "decimal field {which} bound must be a decimal number string, but found \"{other}\""
            ))),
        }
    }
}

fn parse_bound(bound: &Option<String>) -> Option<f64> {
    bound.as_ref().and_then(|s| s.parse().ok())
}

fn derive_range_text(constraint: &Constraint) -> Option<String> {
    match constraint {
        Constraint::None => None,
        Constraint::StringSet { values, .. } => Some(format_string_set(values)),
        Constraint::IntBounds { min, max } => range_description(
            min.map(|m| m.to_string()),
            max.map(|m| m.to_string()),
            true,
            true,
        ),
        Constraint::FloatBounds {
            min,
            max,
            min_inclusive,
            max_inclusive,
        } => range_description(
            min.map(|m| m.to_string()),
            max.map(|m| m.to_string()),
            *min_inclusive,
            *max_inclusive,
        ),
        Constraint::DecimalBounds {
            min,
            max,
            min_inclusive,
            max_inclusive,
            ..
        } => range_description(min.clone(), max.clone(), *min_inclusive, *max_inclusive),
    }
}

fn range_description(
    min: Option<String>,
    max: Option<String>,
    min_inclusive: bool,
    max_inclusive: bool,
) -> Option<String> {
    match (min, max) {
        (None, None) => None,
        (Some(min), Some(max)) => {
            let left = if min_inclusive { '[' } else { '(' };
            let right = if max_inclusive { ']' } else { ')' };
            Some(format!("in {left}{min}, {max}{right}"))
        }
        (Some(min), None) => {
            let condition = if min_inclusive {
                "greater than or equal to "
            } else {
                "greater than "
            };
            Some(format!("{condition}{min}"))
        }
        (None, Some(max)) => {
            let condition = if max_inclusive {
                "less than or equal to "
            } else {
                "less than "
            };
            Some(format!("{condition}{max}"))
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_string_set(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("{{{}}}", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_value_set_membership() {
        let field = FieldType::string()
            .values(["Pod", "Vessel"])
            .build()
            .expect("build field");
        assert!(field.validate(&Value::Str("Pod".to_string())).is_ok());
        let err = field
            .validate(&Value::Str("Whale".to_string()))
            .expect_err("out-of-set value");
        assert!(matches!(err, ModelError::Range(_)), "{err}");
        assert_eq!(field.range(), Some("{\"Pod\", \"Vessel\"}"));
    }

    #[test]
    fn string_translation_targets_are_checked() {
        let err = FieldType::string()
            .values(["Pod"])
            .translations([("v", "Vessel")])
            .build()
            .expect_err("translation target outside the value set");
        assert!(matches!(err, ModelError::Range(_)), "{err}");
    }

    #[test]
    fn translation_normalizes_aliases() {
        let field = FieldType::string()
            .values(["Pod", "Vessel"])
            .translations([("p", "Pod"), ("v", "Vessel")])
            .build()
            .expect("build field");
        assert_eq!(
            field.normalize(Value::Str("p".to_string())),
            Value::Str("Pod".to_string())
        );
        assert_eq!(
            field.normalize(Value::Str("Pod".to_string())),
            Value::Str("Pod".to_string())
        );
    }

    #[test]
    fn integer_bounds() {
        let field = FieldType::integer().min(1).max(3).build().expect("build");
        assert!(field.validate(&Value::Int(1)).is_ok());
        assert!(field.validate(&Value::Int(3)).is_ok());
        assert!(matches!(
            field.validate(&Value::Int(0)),
            Err(ModelError::Range(_))
        ));
        assert!(matches!(
            field.validate(&Value::Int(4)),
            Err(ModelError::Range(_))
        ));
        assert!(matches!(
            field.validate(&Value::Str("x".to_string())),
            Err(ModelError::Type(_))
        ));
        assert_eq!(field.range(), Some("in [1, 3]"));
    }

    #[test]
    fn integer_range_descriptions() {
        let cases: [(Option<i64>, Option<i64>, Option<&str>); 4] = [
            (None, None, None),
            (None, Some(1), Some("less than or equal to 1")),
            (Some(1), None, Some("greater than or equal to 1")),
            (Some(1), Some(2), Some("in [1, 2]")),
        ];
        for (min, max, expected) in cases {
            let mut builder = FieldType::integer();
            if let Some(min) = min {
                builder = builder.min(min);
            }
            if let Some(max) = max {
                builder = builder.max(max);
            }
            let field = builder.build().expect("build");
            assert_eq!(field.range(), expected);
        }
    }

    #[test]
    fn float_exclusive_bounds() {
        let field = FieldType::float()
            .min(0.0)
            .max_exclusive(360.0)
            .build()
            .expect("build");
        assert!(field.validate(&Value::Float(0.0)).is_ok());
        assert!(field.validate(&Value::Float(359.9)).is_ok());
        assert!(matches!(
            field.validate(&Value::Float(360.0)),
            Err(ModelError::Range(_))
        ));
        assert_eq!(field.range(), Some("in [0, 360)"));
    }

    #[test]
    fn float_accepts_integers() {
        let field = FieldType::float().build().expect("build");
        assert!(field.validate(&Value::Int(2)).is_ok());
        assert_eq!(field.normalize(Value::Int(2)), Value::Float(2.0));
    }

    #[test]
    fn decimal_bounds_compare_floats_but_keep_text() {
        let field = FieldType::decimal()
            .min_exclusive(Value::Decimal("1".to_string()))
            .max(Value::Decimal("2".to_string()))
            .build()
            .expect("build");
        assert_eq!(field.range(), Some("in (1, 2]"));
        assert!(field.validate(&Value::Decimal("1.50".to_string())).is_ok());
        assert!(field.validate(&Value::Decimal("2.".to_string())).is_ok());
        assert!(matches!(
            field.validate(&Value::Decimal("1".to_string())),
            Err(ModelError::Range(_))
        ));
        assert!(matches!(
            field.validate(&Value::Decimal("2.1".to_string())),
            Err(ModelError::Range(_))
        ));
        assert!(matches!(
            field.validate(&Value::Decimal("bobo".to_string())),
            Err(ModelError::Type(_))
        ));
    }

    #[test]
    fn bad_default_is_a_construction_error() {
        assert!(matches!(
            FieldType::integer().min(0).default(-1).build(),
            Err(ModelError::Range(_))
        ));
        assert!(matches!(
            FieldType::integer().default("one").build(),
            Err(ModelError::Type(_))
        ));
    }

    #[test]
    fn default_is_translated_before_checking() {
        let field = FieldType::string()
            .values(["Pod"])
            .translations([("p", "Pod")])
            .default("p")
            .build()
            .expect("alias default translates to a set member");
        assert_eq!(field.default(), Some(&Value::Str("Pod".to_string())));
    }

    #[test]
    fn kind_mismatched_options_are_rejected() {
        assert!(FieldType::date().min(1).build().is_err());
        assert!(FieldType::integer().values(["a"]).build().is_err());
        assert!(FieldType::float().translations([("a", "b")]).build().is_err());
    }
}
