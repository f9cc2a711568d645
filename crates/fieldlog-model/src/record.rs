//! Records: typed, validated field-value collections.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::schema::RecordType;
use crate::value::Value;

/// Change notification payload: one field assignment that took effect.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Callback invoked synchronously after each committed field assignment.
pub type RecordListener = Arc<dyn Fn(&FieldChange) + Send + Sync>;

/// An instance of a [`RecordType`] holding one (nullable) value per declared
/// field. Every stored value satisfies its field type's validation; all
/// mutation goes through [`Record::set`].
pub struct Record {
    record_type: Arc<RecordType>,
    values: Vec<Option<Value>>,
    listeners: Vec<(usize, RecordListener)>,
    next_listener_id: usize,
}

impl Record {
    /// Create a record with the given initial values. A field left unset
    /// takes, in order: the record type's default rules (providers invoked
    /// lazily), the field type's default, or null. Supplying an explicit
    /// null suppresses the defaults for that field.
    ///
    /// Construction is atomic: a validation failure yields no record.
    pub fn new<I, S>(record_type: &Arc<RecordType>, values: I) -> Result<Record, ModelError>
    where
        I: IntoIterator<Item = (S, Option<Value>)>,
        S: Into<String>,
    {
        let mut supplied: BTreeMap<String, Option<Value>> = BTreeMap::new();
        for (name, value) in values {
            let name = name.into();
            if record_type.slot(&name).is_none() {
                return Err(record_type.unknown_field(&name));
            }
            supplied.insert(name, value);
        }

        for rule in record_type.defaults() {
            rule.apply(&mut supplied)?;
        }

        let mut slots = Vec::with_capacity(record_type.fields().len());
        for (name, field_type) in record_type.fields() {
            let value = match supplied.remove(name) {
                Some(value) => value,
                None => field_type.default().cloned(),
            };
            let value = value.map(|v| field_type.normalize(v));
            if let Some(v) = &value {
                field_type.validate(v)?;
            }
            slots.push(value);
        }

        Ok(Record {
            record_type: Arc::clone(record_type),
            values: slots,
            listeners: Vec::new(),
            next_listener_id: 0,
        })
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    pub fn get(&self, field: &str) -> Result<Option<&Value>, ModelError> {
        let slot = self
            .record_type
            .slot(field)
            .ok_or_else(|| self.record_type.unknown_field(field))?;
        Ok(self.values[slot].as_ref())
    }

    /// Value at a slot index assigned by the record type. Used by formats
    /// that resolve slots once at construction time.
    pub fn value_at(&self, slot: usize) -> Option<&Value> {
        self.values[slot].as_ref()
    }

    /// Assign a field value. The value is normalized (string translation,
    /// integer-to-float promotion) first; assigning a value equal to the
    /// current one is a no-op with no validation and no notification.
    /// Otherwise the value is validated, stored, and listeners are notified
    /// synchronously. Returns the change that took effect, if any.
    pub fn set(
        &mut self,
        field: &str,
        value: Option<Value>,
    ) -> Result<Option<FieldChange>, ModelError> {
        let slot = self
            .record_type
            .slot(field)
            .ok_or_else(|| self.record_type.unknown_field(field))?;
        let field_type = &self.record_type.fields()[slot].1;

        let value = value.map(|v| field_type.normalize(v));
        if self.values[slot] == value {
            return Ok(None);
        }
        if let Some(v) = &value {
            field_type.validate(v)?;
        }

        let old = std::mem::replace(&mut self.values[slot], value.clone());
        let change = FieldChange {
            field: field.to_string(),
            old,
            new: value,
        };
        // Snapshot so a listener mutating the listener list observes a
        // consistent notification round.
        let listeners: Vec<RecordListener> = self
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(&change);
        }
        Ok(Some(change))
    }

    /// Register a change listener; returns a handle for removal.
    pub fn add_listener(&mut self, listener: RecordListener) -> usize {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: usize) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deep copy with the same record type and values. Listeners are not
    /// carried over.
    pub fn copy(&self) -> Record {
        Record {
            record_type: Arc::clone(&self.record_type),
            values: self.values.clone(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Deep copy with some field values replaced. Overridden values are
    /// normalized and validated; the original record is untouched.
    pub fn copy_with<I, S>(&self, overrides: I) -> Result<Record, ModelError>
    where
        I: IntoIterator<Item = (S, Option<Value>)>,
        S: Into<String>,
    {
        let mut copy = self.copy();
        for (name, value) in overrides {
            copy.set(&name.into(), value)?;
        }
        Ok(copy)
    }
}

impl Clone for Record {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for Record {
    /// Records are equal when they share a record type name and every field
    /// value compares equal. Listeners do not participate.
    fn eq(&self, other: &Self) -> bool {
        self.record_type.name() == other.record_type.name() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.record_type.name())?;
        for (index, (name, _)) in self.record_type.fields().iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match &self.values[index] {
                Some(value) => write!(f, "{name}={value}")?,
                None => write!(f, "{name}=None")?,
            }
        }
        write!(f, ")")
    }
}
