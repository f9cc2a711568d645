//! The shore-survey configuration: concrete record types, the document
//! grammar, the command set, and observation numbering.

pub mod commands;
pub mod fields;
pub mod grammar;
pub mod records;
pub mod serial;

pub use commands::{Clock, command_specs, interpreter, local_clock};
pub use grammar::{GRAMMAR_NAME, document_format, register_grammars};
pub use records::{SurveyTypes, record_types};
pub use serial::{SerialNumberGenerator, SharedSerial, shared_serial};
