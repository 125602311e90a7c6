/// Core Module for ManageDB
///
/// This module contains the database handle, the SQL statement builders it
/// relies on, and the error type shared by the rest of the crate.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ManageDbError, Result};
