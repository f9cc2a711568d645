//! Data model for typed, validated field-note records.
//!
//! A [`FieldType`] is the validation/default/range contract for one field; a
//! [`RecordType`] is the named, composed schema shared by all records of one
//! kind; a [`Record`] holds one validated (nullable) value per declared
//! field. All mutation re-validates and notifies listeners.

pub mod error;
pub mod field;
pub mod record;
pub mod schema;
pub mod value;

pub use error::{ModelError, Result};
pub use field::{FieldKind, FieldType, FieldTypeBuilder};
pub use record::{FieldChange, Record, RecordListener};
pub use schema::{DefaultRule, RecordType, Schema, TupleProvider, ValueProvider};
pub use value::{Value, is_decimal_literal};
