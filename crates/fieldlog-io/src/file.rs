//! Reading and writing field-note data files.
//!
//! A data file carries two header lines: the fixed family header and a line
//! naming the grammar, either `grammar "<name>"` or `format <name>`. A blank
//! line follows, then one record per non-blank line. All parsing and
//! formatting is delegated to the named [`DocumentFormat`]; this module only
//! touches the filesystem and the header.

use std::fs;
use std::path::Path;

use fieldlog_document::Document;
use fieldlog_format::DocumentFormat;
use tracing::{debug, info};

use crate::error::FileError;
use crate::registry::GrammarRegistry;

/// The fixed first line identifying the file family.
pub const FILE_HEADER: &str = "fieldlog data";

const GRAMMAR_PREFIX: &str = "grammar ";
const FORMAT_PREFIX: &str = "format ";

/// True when the file starts with the field-note data header.
pub fn is_recognized(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    first_line(&contents) == FILE_HEADER
}

/// Read and parse a whole document, resolving its grammar in `registry`.
pub fn read_document(path: &Path, registry: &GrammarRegistry) -> Result<Document, FileError> {
    let contents = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = split_lines(&contents);

    if lines.first().map(|line| line.trim()) != Some(FILE_HEADER) {
        return Err(FileError::UnrecognizedFormat {
            path: path.to_path_buf(),
        });
    }

    let format_line = lines.get(1).map(|line| line.trim()).unwrap_or_default();
    let name = grammar_name(format_line).ok_or(FileError::MissingHeader {
        what: "grammar specification",
        line: 2,
        path: path.to_path_buf(),
    })?;
    if name.is_empty() {
        return Err(FileError::MissingHeader {
            what: "grammar name",
            line: 2,
            path: path.to_path_buf(),
        });
    }
    let format = registry.get(name).ok_or_else(|| FileError::UnknownGrammar {
        name: name.to_string(),
        line: 2,
        path: path.to_path_buf(),
    })?;

    debug!(grammar = name, path = %path.display(), "reading document");
    let body = lines.iter().skip(2).copied();
    let records = format
        .parse_lines(body, 2)
        .map_err(|source| FileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        grammar = name,
        records = records.len(),
        path = %path.display(),
        "read document"
    );
    Ok(Document::new(records)
        .with_format_name(name)
        .with_file_path(path))
}

/// Format and write a whole document under the standard header.
pub fn write_document(
    document: &Document,
    path: &Path,
    format: &DocumentFormat,
) -> Result<(), FileError> {
    let body = format
        .format_document(document.records())
        .map_err(|source| FileError::Format {
            path: path.to_path_buf(),
            source,
        })?;
    let contents = format!(
        "{FILE_HEADER}\n{GRAMMAR_PREFIX}\"{}\"\n\n{body}",
        format.name()
    );
    fs::write(path, contents).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        grammar = format.name(),
        records = document.len(),
        path = %path.display(),
        "wrote document"
    );
    Ok(())
}

/// Extract the grammar name from the second header line. The `grammar` form
/// takes an optionally-quoted name; the `format` form takes it verbatim.
fn grammar_name(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(GRAMMAR_PREFIX) {
        let name = rest.trim();
        let unquoted = name
            .strip_prefix('"')
            .and_then(|n| n.strip_suffix('"'))
            .unwrap_or(name);
        Some(unquoted)
    } else {
        line.strip_prefix(FORMAT_PREFIX).map(str::trim)
    }
}

fn first_line(contents: &str) -> &str {
    split_lines(contents).first().copied().unwrap_or_default().trim()
}

/// Split on `\n`, `\r\n`, or bare `\r`, so files from any platform parse.
fn split_lines(contents: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = contents.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&contents[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&contents[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&contents[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_names() {
        assert_eq!(
            grammar_name("grammar \"Shore Survey Grammar 1.0\""),
            Some("Shore Survey Grammar 1.0")
        );
        assert_eq!(grammar_name("grammar Bare Name"), Some("Bare Name"));
        assert_eq!(grammar_name("format Shore Survey Grammar 1.0"), Some("Shore Survey Grammar 1.0"));
        assert_eq!(grammar_name("something else"), None);
        assert_eq!(grammar_name("grammar "), Some(""));
    }

    #[test]
    fn line_splitting_handles_all_conventions() {
        assert_eq!(split_lines("a\nb\nc"), ["a", "b", "c"]);
        assert_eq!(split_lines("a\r\nb\r\nc\r\n"), ["a", "b", "c"]);
        assert_eq!(split_lines("a\rb\rc"), ["a", "b", "c"]);
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }
}
