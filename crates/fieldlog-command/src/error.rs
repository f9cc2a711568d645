use fieldlog_format::FormatError;
use fieldlog_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("could not parse command: {source}")]
    Tokenize {
        #[source]
        source: FormatError,
    },

    #[error("unrecognized command \"{name}\"")]
    Unrecognized { name: String },

    #[error("command \"{name}\" takes no arguments")]
    NoArguments { name: String },

    #[error("too many arguments for command \"{name}\": maximum number is {max}")]
    TooManyArguments { name: String, max: usize },

    #[error("could not parse \"{field}\" argument for command \"{name}\": {source}")]
    BadArgument {
        field: String,
        name: String,
        #[source]
        source: Box<FormatError>,
    },

    #[error(
        "bad argument name \"{field}\" in command \"{name}\" format: \
         it is not a formatted field of record type \"{record_type}\""
    )]
    BadFieldName {
        field: String,
        name: String,
        record_type: String,
    },

    #[error("command format \"{format}\" has no command name")]
    EmptyFormat { format: String },

    #[error("duplicate command \"{name}\"")]
    DuplicateCommand { name: String },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CommandError>;
