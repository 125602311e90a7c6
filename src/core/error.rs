/// ManageDB Error Module
///
/// This module defines the error type shared by the database handle, the
/// configuration loader and the interactive menu.
use thiserror::Error;

/// Error type for the managedb crate.
///
/// Store-level failures are carried unmodified in `Database` so callers can
/// inspect the original SQLite error. The remaining variants cover input
/// rejected before anything reaches the store.
#[derive(Error, Debug)]
pub enum ManageDbError {
    /// Errors reported by SQLite (syntax, constraints, missing tables, etc.)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A statement could not be built from the given names and types
    #[error("Query error: {0}")]
    Query(String),

    /// Malformed user input (menu choices, field lists, `key=value` couples)
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and terminal I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation needed an open connection but the handle is closed
    #[error("No database is open")]
    NotOpen,
}

/// Type alias for Result to use ManageDbError as the error type.
pub type Result<T> = std::result::Result<T, ManageDbError>;
