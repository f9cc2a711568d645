//! Text-grammar codec for field-note documents.
//!
//! Records serialize to one line each: a space-joined sequence of literal
//! tokens and formatted field values, with one literal per record type
//! acting as its discriminating key. Parsing dispatches each line to the
//! record format whose key matches, and every field codec guarantees that
//! `parse(format(v, mode), mode) == v` in both display and editing modes.

pub mod document_format;
pub mod error;
pub mod field_format;
mod numeric;
pub mod record_format;
pub mod registry;
pub mod token;

pub use document_format::DocumentFormat;
pub use error::{FormatError, Result};
pub use field_format::{
    AngleFormat, DateFormat, DecimalFormat, EDITING_NONE, FieldFormat, FloatFormat, IntegerFormat,
    Mode, StringFormat, TimeFormat,
};
pub use record_format::{FormatItem, RecordFormat};
pub use registry::{FieldFormatRegistry, FormatConstructor};
pub use token::{NONE_TOKEN, tokenize};
