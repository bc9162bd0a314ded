//! USB ID error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from parsing vendor/product identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Identifier string was empty (after stripping any `0x` prefix)
    #[error("Empty hex identifier")]
    Empty,

    /// More than four hex digits
    #[error("Hex identifier too long: '{0}' (max 4 digits)")]
    TooLong(String),

    /// Contains characters outside [0-9a-fA-F]
    #[error("Invalid hex identifier: '{0}'")]
    InvalidHex(String),

    /// Pair was not in `VID:PID` form
    #[error("Invalid device id '{0}', expected VID:PID (e.g. '046d:c52b')")]
    InvalidPair(String),
}

/// Errors from reading a USB ID database
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Database file does not exist
    #[error("USB ID database not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// None of the candidate locations held a database
    #[error("No USB ID database found (searched {searched} locations)")]
    NoCandidates { searched: usize },

    /// I/O error while reading the database
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for database results
pub type Result<T> = std::result::Result<T, DatabaseError>;
