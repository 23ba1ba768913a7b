use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("No ATOM records found")]
    NoAtomRecords,
    #[error("Unsupported structure file extension: '{0}'")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Expected at least {expected} whitespace-separated fields, found {found}")]
    MissingToken { expected: usize, found: usize },
    #[error("Invalid float in field {index} (value: '{value}')")]
    InvalidTokenFloat { index: usize, value: String },
    #[error("Columns {columns} are missing or empty")]
    MissingColumns { columns: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidColumnFloat { columns: String, value: String },
}
