//! Crate-wide error type.
//!
//! Every fallible operation in the core returns `Result<_, OmbudError>`. The
//! four variants are the full taxonomy the desk reports to its callers
//! (views, API handlers, report generators): nothing is logged-and-swallowed
//! inside the core.

use std::fmt;

/// Core error type
#[derive(Debug)]
pub enum OmbudError {
    /// Malformed input: rating out of range, unknown status value, missing
    /// required field, subcategory not under the chosen category.
    Validation(String),
    /// Actor lacks the role or ownership the operation requires. No state
    /// change has occurred.
    Permission(String),
    /// Write-time conflict: duplicate complaint number, daily sequence
    /// exhausted, duplicate feedback row. Numbering conflicts are retried a
    /// bounded number of times before this surfaces.
    Conflict(String),
    /// Referenced complaint, account, category, or subcategory does not exist.
    NotFound(String),
}

impl fmt::Display for OmbudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OmbudError::Validation(s) => {
                write!(f, "Validation error: {s}")
            }
            OmbudError::Permission(s) => {
                write!(f, "Permission error: {s}")
            }
            OmbudError::Conflict(s) => {
                write!(f, "Conflict: {s}")
            }
            OmbudError::NotFound(s) => {
                write!(f, "Not found: {s}")
            }
        }
    }
}

impl std::error::Error for OmbudError {}

impl From<csv::Error> for OmbudError {
    fn from(err: csv::Error) -> Self {
        OmbudError::Validation(format!("csv export failed: {err}"))
    }
}

impl OmbudError {
    /// True when retrying the same operation may succeed (numbering races).
    pub fn is_retryable(&self) -> bool {
        matches!(self, OmbudError::Conflict(msg) if msg.contains("already exists"))
    }
}
