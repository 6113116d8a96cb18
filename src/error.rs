//! Custom error types for the exporter.

use std::fmt;
use std::io;

/// An error that can occur while building or rendering a CSV export.
#[derive(Debug)]
pub enum CsvError {
    /// The configured charset name is not a known encoding.
    UnsupportedCharset(String),
    /// The rendered text contains characters the target charset cannot represent.
    Unencodable { charset: String },
    /// The input bytes are not a valid sequence in the configured charset.
    Undecodable { charset: String },
    /// A keyed-record append referenced a key absent from the record.
    MissingField(String),
    /// A file sink operation failed.
    Io(io::Error),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::UnsupportedCharset(name) => {
                write!(f, "Unsupported charset: {}", name)
            }
            CsvError::Unencodable { charset } => {
                write!(f, "Input contains characters not representable in {}", charset)
            }
            CsvError::Undecodable { charset } => {
                write!(f, "Input is not a valid {} byte sequence", charset)
            }
            CsvError::MissingField(key) => {
                write!(f, "Record is missing field {:?}", key)
            }
            CsvError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(err: io::Error) -> Self {
        CsvError::Io(err)
    }
}
