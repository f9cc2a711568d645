//! Atomic, invertible record-range replacements.

use fieldlog_model::Record;

/// One committed replacement of the record range `[start, end)` by `new`.
/// An edit owns deep copies of both the removed and the inserted records,
/// so later mutation of the live sequence cannot corrupt history.
#[derive(Debug, Clone)]
pub struct Edit {
    name: String,
    start: usize,
    end: usize,
    old: Vec<Record>,
    new: Vec<Record>,
}

impl Edit {
    pub(crate) fn new(
        name: impl Into<String>,
        start: usize,
        end: usize,
        old: Vec<Record>,
        new: Vec<Record>,
    ) -> Edit {
        Edit {
            name: name.into(),
            start,
            end,
            old,
            new,
        }
    }

    /// Name shown in undo/redo menu affordances.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The records this edit removed.
    pub fn old(&self) -> &[Record] {
        &self.old
    }

    /// The records this edit inserted.
    pub fn new_records(&self) -> &[Record] {
        &self.new
    }

    /// The edit that exactly reverses this one: it targets the range now
    /// occupied by the inserted records and puts the removed ones back.
    pub fn inverse(&self) -> Edit {
        Edit {
            name: format!("{} Inverse", self.name),
            start: self.start,
            end: self.start + self.new.len(),
            old: deep_copy(&self.new),
            new: deep_copy(&self.old),
        }
    }

    /// Splice this edit into a record sequence. The range is assumed to have
    /// been validated against the sequence when the edit was created.
    pub(crate) fn apply(&self, records: &mut Vec<Record>) {
        records.splice(self.start..self.end, deep_copy(&self.new));
    }
}

pub(crate) fn deep_copy(records: &[Record]) -> Vec<Record> {
    records.iter().map(Record::copy).collect()
}
