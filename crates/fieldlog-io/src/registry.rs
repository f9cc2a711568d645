//! Grammar registry: document formats looked up by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldlog_format::DocumentFormat;

/// Name-to-format lookup used when a data file names its grammar.
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    formats: BTreeMap<String, Arc<DocumentFormat>>,
}

impl GrammarRegistry {
    pub fn new() -> GrammarRegistry {
        GrammarRegistry::default()
    }

    /// Register a format under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(&mut self, format: Arc<DocumentFormat>) {
        self.formats.insert(format.name().to_string(), format);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<DocumentFormat>> {
        self.formats.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
