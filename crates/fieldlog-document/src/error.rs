use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// An edit range outside the current document bounds. This is a caller
    /// programming error, not a user-recoverable condition.
    #[error("{0}")]
    Index(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, DocumentError>;
