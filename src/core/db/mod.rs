/// Database Module
///
/// This module provides the data-access layer of ManageDB, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): the `DatabaseHandle` owning the connection
/// - **Statement Building** (`statement.rs`): assembles CREATE/INSERT/SELECT/DELETE statements
/// - **Query Results** (`query.rs`): record type and value formatting
/// - **Schema Introspection** (`schema.rs`): table and column metadata
///
/// ## Error Handling
///
/// Errors raised by SQLite are propagated unmodified inside
/// `ManageDbError::Database`.
pub mod connection;
pub mod query;
pub mod schema;
pub mod statement;

pub use connection::*;
pub use query::*;
pub use schema::*;
pub use statement::*;
