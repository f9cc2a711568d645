use fieldlog_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unterminated quote in \"{text}\"")]
    UnterminatedQuote { text: String },

    #[error("bad decimal number \"{text}\"")]
    BadDecimal { text: String },

    #[error("could not parse \"{text}\" as an integer")]
    BadInteger { text: String },

    #[error("could not parse \"{text}\" as a floating point number")]
    BadFloat { text: String },

    #[error("bad angle \"{text}\"")]
    BadAngle { text: String },

    #[error("bad date \"{text}\"")]
    BadDate { text: String },

    #[error("month must be in range [1, 12]")]
    BadMonth,

    #[error("day must be in range [1, {days}] for month {month} of {year}")]
    BadDay { year: i32, month: u32, days: u32 },

    #[error("bad time \"{text}\"")]
    BadTime { text: String },

    #[error("hour must be in range [0, 23]")]
    BadHour,

    #[error("minute must be in range [0, 59]")]
    BadMinute,

    #[error("second must be in range [0, 59]")]
    BadSecond,

    #[error("bad numeric template \"{template}\"")]
    BadTemplate { template: String },

    #[error("bad literal \"{token}\": expecting \"{expected}\"")]
    BadLiteral { token: String, expected: String },

    #[error(
        "record \"{line}\" of type \"{record_type}\" has wrong number of tokens \
         ({actual} instead of {expected})"
    )]
    TokenCount {
        line: String,
        record_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("record type could not be determined")]
    UnknownRecordType,

    #[error("no format for record type \"{name}\"")]
    UnknownFormatName { name: String },

    #[error("record of type \"{actual}\" formatted with the format for \"{expected}\"")]
    WrongRecordType { expected: String, actual: String },

    #[error("for field \"{field}\": {source}")]
    Field {
        field: String,
        #[source]
        source: Box<FormatError>,
    },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<FormatError>,
    },

    #[error("bad item \"{item}\" in record format \"{spec}\": {message}")]
    BadSpecItem {
        item: String,
        spec: String,
        message: String,
    },

    #[error("no key specified in record format \"{spec}\"")]
    MissingKey { spec: String },

    #[error("more than one key specified in record format \"{spec}\"")]
    ExtraKey { spec: String },

    #[error("duplicate discriminating key \"{key}\" shared by record types \"{first}\" and \"{second}\"")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("duplicate format for record type \"{name}\"")]
    DuplicateRecordFormat { name: String },

    #[error("no field format registered for field type \"{type_name}\"")]
    UnresolvedFieldFormat { type_name: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl FormatError {
    /// Annotate this error with the field whose token failed to parse.
    pub fn in_field(self, field: &str) -> FormatError {
        FormatError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Annotate this error with a 1-based line number.
    pub fn at_line(self, line: usize) -> FormatError {
        FormatError::Line {
            line,
            source: Box::new(self),
        }
    }

    /// The 1-based line number this error was annotated with, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::Line { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
