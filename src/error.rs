//! Error handling for flat-record encoding and the surrounding tooling.
//!
//! Decoding never produces errors: per-field failures are collected in a
//! [`DecodeReport`](crate::codec::DecodeReport) instead. The types here cover
//! the strict side of the codec (line buffer writes during encoding) plus the
//! file, layout and configuration handling around it.

use thiserror::Error;

/// Failures raised by [`LineBuffer::write`](crate::codec::LineBuffer::write).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    #[error("begin index {begin} is out of range for a line of {len} columns")]
    BeginOutOfRange { begin: usize, len: usize },

    #[error("end index {end} is out of range for a line of {len} columns")]
    EndOutOfRange { end: usize, len: usize },

    #[error("text of {text_len} columns is longer than the range {begin}-{end}")]
    TextTooLongForRange {
        text_len: usize,
        begin: usize,
        end: usize,
    },

    #[error(
        "column {column} already holds {existing:?}, refusing to rewrite it with {incoming:?}"
    )]
    IncoherentOverlap {
        column: usize,
        existing: char,
        incoming: char,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    /// A field could not be written into the output line
    #[error("Cannot write field '{field}': {source}")]
    Write {
        field: String,
        #[source]
        source: LineError,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A layout document describes an impossible schema
    #[error("Layout error: {message}")]
    Layout { message: String },

    /// A JSON value does not fit the kind its layout field declares
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl Error {
    /// Wrap a line buffer failure with the name of the field being written
    pub fn write(field: impl Into<String>, source: LineError) -> Self {
        Self::Write {
            field: field.into(),
            source,
        }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn layout(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The underlying line buffer failure, if this is a write error
    pub fn line_error(&self) -> Option<LineError> {
        match self {
            Self::Write { source, .. } => Some(*source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
