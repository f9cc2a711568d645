//! Result types shared by the CLI commands.

use std::path::PathBuf;

use serde::Serialize;

/// Outcome of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    pub grammar: String,
    pub records: usize,
    pub counts: Vec<TypeCount>,
}

/// Number of records of one type in a document.
#[derive(Debug, Clone, Serialize)]
pub struct TypeCount {
    pub record_type: String,
    pub records: usize,
}

/// Outcome of rewriting one document in canonical form.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub records: usize,
}
