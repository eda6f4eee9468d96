use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Delimited output error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("invalid number '{value}'")]
    InvalidFloat { value: String },
    #[error("invalid site index '{value}'")]
    InvalidIndex { value: String },
    #[error("unrecognized residue code '{value}'")]
    UnknownResidue { value: String },
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

impl TableError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        TableError::Parse { line, kind }
    }
}

/// Parses one numeric cell, reporting the 1-based `line` on failure.
pub(crate) fn parse_float(token: &str, line: usize) -> Result<f64, TableError> {
    token.parse::<f64>().map_err(|_| {
        TableError::parse(
            line,
            ParseErrorKind::InvalidFloat {
                value: token.to_string(),
            },
        )
    })
}
