use std::path::PathBuf;

use fieldlog_format::FormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file \"{path}\" does not start with the field-note data header")]
    UnrecognizedFormat { path: PathBuf },

    #[error("{what} missing at line {line} of data file \"{path}\"")]
    MissingHeader {
        what: &'static str,
        line: usize,
        path: PathBuf,
    },

    #[error("unknown grammar \"{name}\" specified at line {line} of data file \"{path}\"")]
    UnknownGrammar {
        name: String,
        line: usize,
        path: PathBuf,
    },

    #[error("failed to parse data file \"{path}\": {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("failed to format document for \"{path}\": {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

pub type Result<T> = std::result::Result<T, FileError>;
