//! Error types for the ingestion pipeline and reporting queries.

use thiserror::Error;

/// Main error type for paddock-api.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input line. Aborts ingestion of the current file.
    #[error("parse error: {reason} in line {line:?}")]
    Parse { line: String, reason: String },

    /// Lap-time log references a code with no entry in the abbreviation table.
    #[error("unknown abbreviation code: {0}")]
    UnknownAbbreviation(String),

    /// Relational invariant broken (negative duration, missing foreign key).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Reporting query for a nonexistent record. Surfaced as a 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// SQLite connectivity or constraint failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// File I/O error while reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(line: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
