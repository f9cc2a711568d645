use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Wrong runtime type for a field value.
    #[error("type error: {0}")]
    Type(String),

    /// Correct type, but the value violates the declared bounds or
    /// enumeration of its field type.
    #[error("range error: {0}")]
    Range(String),

    /// Lookup of a field name a record type does not declare.
    #[error("record type \"{record_type}\" has no field \"{field}\"")]
    UnknownField { record_type: String, field: String },

    /// Invalid field-type or record-type declaration.
    #[error("invalid declaration: {0}")]
    Declaration(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
