//! Document formats: a set of record formats plus keyword dispatch.
//!
//! Classification of an input line works by discriminating key: the formats
//! are grouped by the token position of their key, positions are tried in
//! order of increasing key-set size (a short, distinctive keyword set wins
//! over a large one), and the first format whose key set contains the token
//! at its position parses the line.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fieldlog_model::Record;

use crate::error::FormatError;
use crate::record_format::RecordFormat;
use crate::token::tokenize;

#[derive(Debug, Clone)]
pub struct DocumentFormat {
    name: String,
    by_name: BTreeMap<String, Arc<RecordFormat>>,
    by_key: BTreeMap<String, Arc<RecordFormat>>,
    /// (key token position, keys at that position), ascending by set size.
    key_sets: Vec<(usize, BTreeSet<String>)>,
}

impl DocumentFormat {
    /// Assemble a named document format. Duplicate record-type names and
    /// duplicate discriminating keys are construction-time errors.
    pub fn new(
        name: impl Into<String>,
        formats: impl IntoIterator<Item = RecordFormat>,
    ) -> Result<DocumentFormat, FormatError> {
        let mut by_name: BTreeMap<String, Arc<RecordFormat>> = BTreeMap::new();
        let mut by_key: BTreeMap<String, Arc<RecordFormat>> = BTreeMap::new();
        let mut grouped: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();

        for format in formats {
            let format = Arc::new(format);
            let type_name = format.record_type().name().to_string();
            let key = format.key().to_string();

            if let Some(existing) = by_key.get(&key) {
                return Err(FormatError::DuplicateKey {
                    key,
                    first: existing.record_type().name().to_string(),
                    second: type_name,
                });
            }
            if by_name.contains_key(&type_name) {
                return Err(FormatError::DuplicateRecordFormat { name: type_name });
            }

            grouped
                .entry(format.key_index())
                .or_default()
                .insert(key.clone());
            by_key.insert(key, Arc::clone(&format));
            by_name.insert(type_name, format);
        }

        let mut key_sets: Vec<(usize, BTreeSet<String>)> = grouped.into_iter().collect();
        key_sets.sort_by_key(|(_, keys)| keys.len());

        Ok(DocumentFormat {
            name: name.into(),
            by_name,
            by_key,
            key_sets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_format(&self, record_type: &str) -> Result<&Arc<RecordFormat>, FormatError> {
        self.by_name
            .get(record_type)
            .ok_or_else(|| FormatError::UnknownFormatName {
                name: record_type.to_string(),
            })
    }

    pub fn record_formats(&self) -> impl Iterator<Item = &Arc<RecordFormat>> {
        self.by_name.values()
    }

    pub fn record_type_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn format_record(&self, record: &Record) -> Result<String, FormatError> {
        self.record_format(record.type_name())?.format_record(record)
    }

    /// Format a whole document: one newline-terminated line per record.
    pub fn format_document(&self, records: &[Record]) -> Result<String, FormatError> {
        let mut out = String::new();
        for record in records {
            out.push_str(&self.format_record(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Classify and parse one line by its discriminating key token.
    pub fn parse_line(&self, line: &str) -> Result<Record, FormatError> {
        let tokens = tokenize(line)?;
        for (index, keys) in &self.key_sets {
            // A token matching a key is assumed to be the key literal.
            if let Some(token) = tokens.get(*index)
                && keys.contains(token)
                && let Some(format) = self.by_key.get(token)
            {
                return format.parse_tokens(&tokens, line);
            }
        }
        Err(FormatError::UnknownRecordType)
    }

    /// Parse a whole document. Empty lines are skipped; an error on any
    /// other line is annotated with its 1-based line number, counting from
    /// `start_line` lines already consumed by the caller.
    pub fn parse_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
        start_line: usize,
    ) -> Result<Vec<Record>, FormatError> {
        let mut records = Vec::new();
        for (offset, line) in lines.into_iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            match self.parse_line(line) {
                Ok(record) => records.push(record),
                Err(e) => return Err(e.at_line(start_line + offset + 1)),
            }
        }
        Ok(records)
    }

    pub fn parse_document(&self, text: &str) -> Result<Vec<Record>, FormatError> {
        self.parse_lines(text.lines(), 0)
    }
}
