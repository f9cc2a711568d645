//! Record types and their composition from declaration layers.
//!
//! A record type is built by merging an ordered chain of [`Schema`] layers,
//! most general first. A later layer's declaration of an already-seen field
//! name replaces the earlier one (the type may change); the final field order
//! is the lexicographic sort of the merged names, and each field gets a
//! stable slot index used by record storage.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::field::FieldType;
use crate::value::Value;

/// A zero-argument default-value provider. Providers own whatever state they
/// need (for example a shared serial-number counter) and are invoked lazily,
/// only when a field they supply is still unset.
pub type ValueProvider = Arc<dyn Fn() -> Value + Send + Sync>;

/// A provider supplying one value per field of a joint default rule.
pub type TupleProvider = Arc<dyn Fn() -> Vec<Value> + Send + Sync>;

/// Default-value strategy for one or more fields of a record type.
#[derive(Clone)]
pub enum DefaultRule {
    Constant {
        field: String,
        value: Value,
    },
    Provider {
        field: String,
        provider: ValueProvider,
    },
    Joint {
        fields: Vec<String>,
        values: Vec<Value>,
    },
    /// A joint provider is invoked at most once per record construction, and
    /// only when at least one of its fields is unset, so stateful providers
    /// see no needless calls.
    JointProvider {
        fields: Vec<String>,
        provider: TupleProvider,
    },
}

impl DefaultRule {
    pub fn fields(&self) -> Vec<&str> {
        match self {
            DefaultRule::Constant { field, .. } | DefaultRule::Provider { field, .. } => {
                vec![field.as_str()]
            }
            DefaultRule::Joint { fields, .. } | DefaultRule::JointProvider { fields, .. } => {
                fields.iter().map(String::as_str).collect()
            }
        }
    }

    /// Fill every still-unset field of this rule into `supplied`. Providers
    /// run only when at least one of their fields is missing.
    pub fn apply(
        &self,
        supplied: &mut BTreeMap<String, Option<Value>>,
    ) -> Result<(), ModelError> {
        match self {
            DefaultRule::Constant { field, value } => {
                if !supplied.contains_key(field) {
                    supplied.insert(field.clone(), Some(value.clone()));
                }
                Ok(())
            }
            DefaultRule::Provider { field, provider } => {
                if !supplied.contains_key(field) {
                    supplied.insert(field.clone(), Some(provider()));
                }
                Ok(())
            }
            DefaultRule::Joint { fields, values } => {
                fill_joint(fields, values.clone(), supplied)
            }
            DefaultRule::JointProvider { fields, provider } => {
                if fields.iter().all(|f| supplied.contains_key(f)) {
                    return Ok(());
                }
                fill_joint(fields, provider(), supplied)
            }
        }
    }
}

fn fill_joint(
    fields: &[String],
    values: Vec<Value>,
    supplied: &mut BTreeMap<String, Option<Value>>,
) -> Result<(), ModelError> {
    if values.len() != fields.len() {
        return Err(ModelError::Declaration(format!(
            "joint default for ({}) supplied {} values for {} fields",
            fields.join(", "),
            values.len(),
            fields.len()
        )));
    }
    if fields.iter().all(|f| supplied.contains_key(f)) {
        return Ok(());
    }
    for (field, value) in fields.iter().zip(values) {
        if !supplied.contains_key(field) {
            supplied.insert(field.clone(), Some(value));
        }
    }
    Ok(())
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultRule::Constant { field, value } => f
                .debug_struct("Constant")
                .field("field", field)
                .field("value", value)
                .finish(),
            DefaultRule::Provider { field, .. } => {
                f.debug_struct("Provider").field("field", field).finish()
            }
            DefaultRule::Joint { fields, values } => f
                .debug_struct("Joint")
                .field("fields", fields)
                .field("values", values)
                .finish(),
            DefaultRule::JointProvider { fields, .. } => f
                .debug_struct("JointProvider")
                .field("fields", fields)
                .finish(),
        }
    }
}

/// One declaration layer: an ordered list of field declarations plus any
/// default rules the layer contributes.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldType)>,
    defaults: Vec<DefaultRule>,
}

impl Schema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Schema {
            fields: fields
                .into_iter()
                .map(|(name, field)| (name.into(), field))
                .collect(),
            defaults: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = DefaultRule>) -> Self {
        self.defaults = defaults.into_iter().collect();
        self
    }

    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    pub fn defaults(&self) -> &[DefaultRule] {
        &self.defaults
    }
}

/// The named schema shared by all records of one kind: field name to field
/// type, plus accumulated default rules.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    fields: Vec<(String, FieldType)>,
    slots: BTreeMap<String, usize>,
    defaults: Vec<DefaultRule>,
}

impl RecordType {
    /// Merge declaration layers, oldest first, letting each later layer
    /// overwrite same-named fields so the most specific declaration wins.
    /// Default rules accumulate in order; a later rule for the same field
    /// tuple replaces the earlier one.
    pub fn compose(name: impl Into<String>, layers: &[&Schema]) -> Result<RecordType, ModelError> {
        let name = name.into();
        let mut merged: BTreeMap<String, FieldType> = BTreeMap::new();
        let mut defaults: Vec<DefaultRule> = Vec::new();

        for layer in layers {
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            for (field_name, field_type) in layer.fields() {
                if !seen.insert(field_name) {
                    return Err(ModelError::Declaration(format!(
                        "record type \"{name}\" declares field \"{field_name}\" twice in one layer"
                    )));
                }
                merged.insert(field_name.clone(), field_type.clone());
            }
            for rule in layer.defaults() {
                match defaults.iter().position(|r| r.fields() == rule.fields()) {
                    Some(index) => defaults[index] = rule.clone(),
                    None => defaults.push(rule.clone()),
                }
            }
        }

        // Rules and constant rule values are checked now so a bad
        // declaration fails here rather than on first record construction.
        for rule in &defaults {
            for field in rule.fields() {
                let Some(field_type) = merged.get(field) else {
                    return Err(ModelError::Declaration(format!(
                        "default rule for record type \"{name}\" names unknown field \"{field}\""
                    )));
                };
                let constant = match rule {
                    DefaultRule::Constant { value, .. } => Some(value.clone()),
                    DefaultRule::Joint { fields, values } => {
                        if values.len() != fields.len() {
                            return Err(ModelError::Declaration(format!(
                                "joint default for ({}) supplied {} values for {} fields",
                                fields.join(", "),
                                values.len(),
                                fields.len()
                            )));
                        }
                        let index = fields.iter().position(|f| f == field);
                        index.map(|i| values[i].clone())
                    }
                    _ => None,
                };
                if let Some(value) = constant {
                    field_type.validate(&field_type.normalize(value))?;
                }
            }
        }

        let fields: Vec<(String, FieldType)> = merged.into_iter().collect();
        let slots = fields
            .iter()
            .enumerate()
            .map(|(index, (field_name, _))| (field_name.clone(), index))
            .collect();

        Ok(RecordType {
            name,
            fields,
            slots,
            defaults,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in final (lexicographic) order; the position of each pair is
    /// the field's slot index.
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.slot(name).map(|slot| &self.fields[slot].1)
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub fn defaults(&self) -> &[DefaultRule] {
        &self.defaults
    }

    pub(crate) fn unknown_field(&self, field: &str) -> ModelError {
        ModelError::UnknownField {
            record_type: self.name.clone(),
            field: field.to_string(),
        }
    }
}
