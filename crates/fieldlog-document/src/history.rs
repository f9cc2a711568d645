//! Undo/redo log with saved-position tracking.

use crate::edit::Edit;
use crate::error::DocumentError;

/// Stack-based undo/redo log of committed edits.
///
/// The saved marker records the undo-stack depth at the last "mark saved"
/// call; the document is clean exactly when the current depth equals the
/// marker. Appending a new edit clears the redo stack, and a marker that
/// pointed into the cleared region becomes unreachable: the document then
/// reads dirty at every position until the next save.
#[derive(Debug)]
pub struct EditHistory {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
    saved_position: Option<usize>,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    pub fn new() -> EditHistory {
        EditHistory {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            saved_position: Some(0),
        }
    }

    /// Append a freshly-applied edit, clearing the redo stack.
    pub fn append(&mut self, edit: Edit) {
        self.undo_stack.push(edit);
        self.redo_stack.clear();
        if let Some(position) = self.saved_position
            && position >= self.undo_stack.len()
        {
            self.saved_position = None;
        }
    }

    /// Pop the most recent edit, move it to the redo stack, and return its
    /// inverse for the caller to apply.
    pub fn undo(&mut self) -> Result<Edit, DocumentError> {
        let edit = self.undo_stack.pop().ok_or(DocumentError::NothingToUndo)?;
        let inverse = edit.inverse();
        self.redo_stack.push(edit);
        Ok(inverse)
    }

    /// Pop the most recently undone edit, move it back to the undo stack,
    /// and return it for the caller to re-apply.
    pub fn redo(&mut self) -> Result<Edit, DocumentError> {
        let edit = self.redo_stack.pop().ok_or(DocumentError::NothingToRedo)?;
        self.undo_stack.push(edit.clone());
        Ok(edit)
    }

    /// Name of the edit that would be undone next, if any.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(Edit::name)
    }

    /// Name of the edit that would be redone next, if any.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(Edit::name)
    }

    pub fn peek_undo(&self) -> Option<&Edit> {
        self.undo_stack.last()
    }

    /// True when the current undo/redo position equals the last-saved one.
    pub fn saved(&self) -> bool {
        self.saved_position == Some(self.undo_stack.len())
    }

    /// Record the current position as the saved state.
    pub fn mark_saved(&mut self) {
        self.saved_position = Some(self.undo_stack.len());
    }

    /// Number of edits currently on the undo stack.
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Edit;

    fn edit(name: &str) -> Edit {
        Edit::new(name, 0, 0, Vec::new(), Vec::new())
    }

    #[test]
    fn undo_and_redo_move_edits_between_stacks() {
        let mut history = EditHistory::new();
        assert_eq!(history.undo_name(), None);
        assert_eq!(history.redo_name(), None);

        history.append(edit("one"));
        assert_eq!(history.undo_name(), Some("one"));

        let inverse = history.undo().expect("undo");
        assert_eq!(inverse.name(), "one Inverse");
        assert_eq!(history.undo_name(), None);
        assert_eq!(history.redo_name(), Some("one"));

        let replay = history.redo().expect("redo");
        assert_eq!(replay.name(), "one");
        assert_eq!(history.undo_name(), Some("one"));
        assert_eq!(history.redo_name(), None);
    }

    #[test]
    fn empty_stacks_are_state_errors() {
        let mut history = EditHistory::new();
        assert!(matches!(history.undo(), Err(DocumentError::NothingToUndo)));
        assert!(matches!(history.redo(), Err(DocumentError::NothingToRedo)));
    }

    #[test]
    fn append_clears_the_redo_stack() {
        let mut history = EditHistory::new();
        history.append(edit("one"));
        history.append(edit("two"));
        history.undo().expect("undo");
        assert_eq!(history.redo_name(), Some("two"));

        history.append(edit("three"));
        assert_eq!(history.redo_name(), None);
        assert_eq!(history.undo_name(), Some("three"));
        assert_eq!(history.depth(), 2);
    }

    #[test]
    fn saved_tracking_follows_the_timeline() {
        let mut history = EditHistory::new();
        assert!(history.saved());

        history.append(edit("one"));
        assert!(!history.saved());

        history.undo().expect("undo");
        assert!(history.saved());

        history.redo().expect("redo");
        assert!(!history.saved());

        history.mark_saved();
        assert!(history.saved());

        history.undo().expect("undo");
        assert!(!history.saved());

        history.redo().expect("redo");
        assert!(history.saved());

        history.append(edit("two"));
        assert!(!history.saved());

        history.undo().expect("undo");
        assert!(history.saved());

        history.undo().expect("undo");
        assert!(!history.saved());

        history.mark_saved();
        assert!(history.saved());

        history.redo().expect("redo");
        assert!(!history.saved());

        history.redo().expect("redo");
        assert!(!history.saved());
    }

    #[test]
    fn unreachable_saved_marker_stays_dirty() {
        let mut history = EditHistory::new();
        history.append(edit("one"));
        history.append(edit("two"));
        history.mark_saved();

        // Undo past the marker and branch off: the saved state can no
        // longer be reached by undo or redo.
        history.undo().expect("undo");
        history.append(edit("three"));
        assert!(!history.saved());
        history.undo().expect("undo");
        assert!(!history.saved());
        history.undo().expect("undo");
        assert!(!history.saved());
    }
}
