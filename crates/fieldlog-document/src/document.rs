//! The document: a record sequence mutated only through committed edits.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fieldlog_model::Record;
use tracing::debug;

use crate::edit::{Edit, deep_copy};
use crate::error::DocumentError;
use crate::history::EditHistory;

/// Callback invoked synchronously after each committed edit, including
/// undo/redo replays.
pub type EditListener = Arc<dyn Fn(&Edit) + Send + Sync>;

/// An ordered sequence of records with a full undo/redo history and a
/// saved/dirty flag.
///
/// All mutation goes through [`Document::edit`], [`Document::undo`], and
/// [`Document::redo`]; each commits atomically and then notifies listeners
/// in registration order, exactly once per committed edit. Listeners must
/// not call back into `edit` synchronously; re-entrant edits are not
/// supported (this restriction is documented, not enforced).
pub struct Document {
    records: Vec<Record>,
    format_name: Option<String>,
    file_path: Option<PathBuf>,
    history: EditHistory,
    listeners: Vec<(usize, EditListener)>,
    next_listener_id: usize,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("records", &self.records)
            .field("format_name", &self.format_name)
            .field("file_path", &self.file_path)
            .field("history", &self.history)
            .field("listeners", &self.listeners.len())
            .field("next_listener_id", &self.next_listener_id)
            .finish()
    }
}

impl Document {
    pub fn new(records: Vec<Record>) -> Document {
        Document {
            records,
            format_name: None,
            file_path: None,
            history: EditHistory::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Associate the name of the document format this document was read
    /// with. Set once at load time; the core never mutates it.
    pub fn with_format_name(mut self, name: impl Into<String>) -> Document {
        self.format_name = Some(name.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Document {
        self.file_path = Some(path.into());
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn format_name(&self) -> Option<&str> {
        self.format_name.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    /// Register an edit listener; returns a handle for removal.
    pub fn add_listener(&mut self, listener: EditListener) -> usize {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: usize) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replace the record range `[start, end)` with `new_records` as one
    /// named, undoable edit. The range is validated first and the sequence
    /// is untouched on failure.
    pub fn edit(
        &mut self,
        name: &str,
        start: usize,
        end: usize,
        new_records: Vec<Record>,
    ) -> Result<(), DocumentError> {
        check_edit_range(start, end, self.records.len())?;

        debug!(
            name,
            start,
            end,
            inserted = new_records.len(),
            "committing edit"
        );
        let old = deep_copy(&self.records[start..end]);
        let edit = Edit::new(name, start, end, old, new_records);
        edit.apply(&mut self.records);
        self.history.append(edit);
        if let Some(edit) = self.history.peek_undo() {
            notify(&self.listeners, edit);
        }
        Ok(())
    }

    /// Undo the most recent edit, notifying listeners with the inverse edit
    /// actually applied. Fails on an empty undo stack.
    pub fn undo(&mut self) -> Result<Edit, DocumentError> {
        let inverse = self.history.undo()?;
        debug!(name = inverse.name(), "undo");
        inverse.apply(&mut self.records);
        notify(&self.listeners, &inverse);
        Ok(inverse)
    }

    /// Replay the most recently undone edit. Fails on an empty redo stack.
    pub fn redo(&mut self) -> Result<Edit, DocumentError> {
        let edit = self.history.redo()?;
        debug!(name = edit.name(), "redo");
        edit.apply(&mut self.records);
        notify(&self.listeners, &edit);
        Ok(edit)
    }

    /// Name of the edit that would be undone next, for UI affordances.
    pub fn undo_name(&self) -> Option<&str> {
        self.history.undo_name()
    }

    pub fn redo_name(&self) -> Option<&str> {
        self.history.redo_name()
    }

    /// True when the undo/redo position equals the last marked-saved one.
    pub fn saved(&self) -> bool {
        self.history.saved()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }
}

fn check_edit_range(start: usize, end: usize, len: usize) -> Result<(), DocumentError> {
    if start > len {
        return Err(DocumentError::Index(format!(
            "edit start index {start} must not exceed document length {len}"
        )));
    }
    if end > len {
        return Err(DocumentError::Index(format!(
            "edit end index {end} must not exceed document length {len}"
        )));
    }
    if end < start {
        return Err(DocumentError::Index(format!(
            "edit end index {end} must be at least start index {start}"
        )));
    }
    Ok(())
}

fn notify(listeners: &[(usize, EditListener)], edit: &Edit) {
    // Snapshot so a listener mutating the listener list observes a
    // consistent notification round.
    let listeners: Vec<EditListener> = listeners
        .iter()
        .map(|(_, listener)| Arc::clone(listener))
        .collect();
    for listener in &listeners {
        listener(edit);
    }
}
