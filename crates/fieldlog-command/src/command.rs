//! One command: a name, positional argument fields, and default rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldlog_format::{DocumentFormat, FieldFormat, Mode, RecordFormat};
use fieldlog_model::{DefaultRule, Record};

use crate::error::CommandError;

/// Declarative description of one command.
///
/// The format is the command name followed by the fields its positional
/// arguments fill, e.g. `"f azimuth declination object_type object_id"`.
/// Fields left unfilled fall to the default rules, then to the record
/// type's own defaults.
pub struct CommandSpec {
    pub format: String,
    pub record_type: String,
    pub defaults: Vec<DefaultRule>,
}

impl CommandSpec {
    pub fn new(format: impl Into<String>, record_type: impl Into<String>) -> CommandSpec {
        CommandSpec {
            format: format.into(),
            record_type: record_type.into(),
            defaults: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = DefaultRule>) -> CommandSpec {
        self.defaults = defaults.into_iter().collect();
        self
    }
}

pub(crate) struct Command {
    name: String,
    /// Argument fields in positional order, each with its resolved codec.
    arguments: Vec<(String, FieldFormat)>,
    record_format: Arc<RecordFormat>,
    defaults: Vec<DefaultRule>,
}

impl Command {
    /// Resolve a spec against a document format. Argument names must be
    /// formatted fields of the record type, and default rules may only name
    /// declared fields; both are construction-time errors.
    pub(crate) fn new(
        spec: CommandSpec,
        document_format: &DocumentFormat,
    ) -> Result<Command, CommandError> {
        let mut parts = spec.format.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CommandError::EmptyFormat {
                format: spec.format.clone(),
            })?
            .to_string();

        let record_format = Arc::clone(document_format.record_format(&spec.record_type)?);

        let mut arguments = Vec::new();
        for field in parts {
            let format = record_format.field_format(field).ok_or_else(|| {
                CommandError::BadFieldName {
                    field: field.to_string(),
                    name: name.clone(),
                    record_type: spec.record_type.clone(),
                }
            })?;
            arguments.push((field.to_string(), format.clone()));
        }

        for rule in &spec.defaults {
            for field in rule.fields() {
                if record_format.record_type().slot(field).is_none() {
                    return Err(CommandError::BadFieldName {
                        field: field.to_string(),
                        name: name.clone(),
                        record_type: spec.record_type.clone(),
                    });
                }
            }
        }

        Ok(Command {
            name,
            arguments,
            record_format,
            defaults: spec.defaults,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Parse the positional arguments, fill the remaining fields from the
    /// default rules, and build the record.
    pub(crate) fn invoke(&self, args: &[String]) -> Result<Record, CommandError> {
        if args.len() > self.arguments.len() {
            return Err(if self.arguments.is_empty() {
                CommandError::NoArguments {
                    name: self.name.clone(),
                }
            } else {
                CommandError::TooManyArguments {
                    name: self.name.clone(),
                    max: self.arguments.len(),
                }
            });
        }

        let mut supplied = BTreeMap::new();
        for (arg, (field, format)) in args.iter().zip(&self.arguments) {
            let value =
                format
                    .parse(arg, Mode::Display)
                    .map_err(|e| CommandError::BadArgument {
                        field: field.clone(),
                        name: self.name.clone(),
                        source: Box::new(e),
                    })?;
            supplied.insert(field.clone(), value);
        }

        for rule in &self.defaults {
            rule.apply(&mut supplied)?;
        }

        Record::new(self.record_format.record_type(), supplied).map_err(CommandError::from)
    }
}
