//! CLI command implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use fieldlog_io::GrammarRegistry;
use tracing::info;

use crate::types::{CheckReport, RewriteReport, TypeCount};

/// Build the registry of every known grammar.
pub fn grammar_registry() -> anyhow::Result<GrammarRegistry> {
    let mut registry = GrammarRegistry::new();
    fieldlog_survey::register_grammars(&mut registry).context("failed to build survey grammars")?;
    Ok(registry)
}

/// Read and validate one document, reporting record counts per type.
pub fn run_check(path: &Path) -> anyhow::Result<CheckReport> {
    let registry = grammar_registry()?;
    let document = fieldlog_io::read_document(path, &registry)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in document.records() {
        *counts.entry(record.type_name()).or_default() += 1;
    }

    Ok(CheckReport {
        path: path.to_path_buf(),
        grammar: document.format_name().unwrap_or_default().to_string(),
        records: document.len(),
        counts: counts
            .into_iter()
            .map(|(record_type, records)| TypeCount {
                record_type: record_type.to_string(),
                records,
            })
            .collect(),
    })
}

/// Read a document and re-emit it in canonical form.
pub fn run_rewrite(path: &Path, output: Option<&Path>) -> anyhow::Result<RewriteReport> {
    let registry = grammar_registry()?;
    let document = fieldlog_io::read_document(path, &registry)?;

    let Some(name) = document.format_name() else {
        bail!("document has no associated grammar");
    };
    let Some(format) = registry.get(name) else {
        bail!("unknown grammar \"{name}\"");
    };

    let output: PathBuf = output.map_or_else(|| path.to_path_buf(), Path::to_path_buf);
    fieldlog_io::write_document(&document, &output, format)?;
    info!(
        input = %path.display(),
        output = %output.display(),
        "rewrote document"
    );

    Ok(RewriteReport {
        input: path.to_path_buf(),
        output,
        records: document.len(),
    })
}

/// Names of every registered grammar.
pub fn run_grammars() -> anyhow::Result<Vec<String>> {
    let registry = grammar_registry()?;
    Ok(registry.names().map(str::to_string).collect())
}
