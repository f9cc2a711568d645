//! Field-format resolution: registration plus linear fallback.
//!
//! A field type resolves to a codec by trying its `category` tag first (for
//! refinements like `"angle"` on a float field) and falling back to the
//! default registration for its kind. Resolution happens once, at record
//! format construction time.

use std::collections::BTreeMap;

use fieldlog_model::{FieldKind, FieldType};

use crate::error::FormatError;
use crate::field_format::{
    AngleFormat, DateFormat, DecimalFormat, FieldFormat, FloatFormat, IntegerFormat, StringFormat,
    TimeFormat,
};

/// Constructs a codec from the optional `{field:extra}` template text.
pub type FormatConstructor = fn(Option<&str>) -> Result<FieldFormat, FormatError>;

#[derive(Debug, Clone)]
pub struct FieldFormatRegistry {
    by_category: BTreeMap<String, FormatConstructor>,
    by_kind: BTreeMap<FieldKind, FormatConstructor>,
}

impl Default for FieldFormatRegistry {
    /// The standard registrations: one codec per field kind plus the
    /// `"angle"` category for sexagesimal float fields.
    fn default() -> Self {
        let mut registry = FieldFormatRegistry {
            by_category: BTreeMap::new(),
            by_kind: BTreeMap::new(),
        };
        registry.register_kind(FieldKind::String, |extra| {
            reject_template(extra)?;
            Ok(FieldFormat::Str(StringFormat))
        });
        registry.register_kind(FieldKind::Decimal, |extra| {
            reject_template(extra)?;
            Ok(FieldFormat::Decimal(DecimalFormat))
        });
        registry.register_kind(FieldKind::Integer, |extra| {
            Ok(FieldFormat::Integer(IntegerFormat::new(extra)?))
        });
        registry.register_kind(FieldKind::Float, |extra| {
            Ok(FieldFormat::Float(FloatFormat::new(extra)?))
        });
        registry.register_kind(FieldKind::Date, |extra| {
            reject_template(extra)?;
            Ok(FieldFormat::Date(DateFormat))
        });
        registry.register_kind(FieldKind::Time, |extra| {
            reject_template(extra)?;
            Ok(FieldFormat::Time(TimeFormat))
        });
        registry.register_category("angle", |extra| {
            reject_template(extra)?;
            Ok(FieldFormat::Angle(AngleFormat))
        });
        registry
    }
}

impl FieldFormatRegistry {
    pub fn register_kind(&mut self, kind: FieldKind, constructor: FormatConstructor) {
        self.by_kind.insert(kind, constructor);
    }

    pub fn register_category(&mut self, category: impl Into<String>, constructor: FormatConstructor) {
        self.by_category.insert(category.into(), constructor);
    }

    /// Resolve a codec for `field_type`, passing `extra` template text from
    /// the placeholder through to the constructor.
    pub fn resolve(
        &self,
        field_type: &FieldType,
        extra: Option<&str>,
    ) -> Result<FieldFormat, FormatError> {
        if let Some(category) = field_type.category()
            && let Some(constructor) = self.by_category.get(category)
        {
            return constructor(extra);
        }
        match self.by_kind.get(&field_type.kind()) {
            Some(constructor) => constructor(extra),
            None => Err(FormatError::UnresolvedFieldFormat {
                type_name: field_type
                    .category()
                    .unwrap_or(field_type.kind().type_name())
                    .to_string(),
            }),
        }
    }
}

fn reject_template(extra: Option<&str>) -> Result<(), FormatError> {
    match extra {
        None => Ok(()),
        Some(template) => Err(FormatError::BadTemplate {
            template: template.to_string(),
        }),
    }
}
