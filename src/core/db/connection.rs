/// Connection Management Module
///
/// This module provides the `DatabaseHandle`, which owns at most one SQLite
/// connection and exposes the table-level operations of ManageDB on it.

use crate::core::db::query::{collect_records, Record};
use crate::core::db::schema::{self, Column};
use crate::core::db::statement::{self, Assignments, FieldSpec, SqlRequest};
use crate::core::{ManageDbError, Result};
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Path opened when no other path has been given
pub const DEFAULT_DB_PATH: &str = "tst.sqlite";

/// Handle over a single SQLite database
///
/// The handle is either closed or holds one open connection. Every
/// statement it runs is committed before the call returns, and the
/// connection is committed and released when the handle is closed,
/// re-opened or dropped.
#[derive(Debug)]
pub struct DatabaseHandle {
    /// Path opened by `open(None)`; ":memory:" for an in-memory database
    path: String,
    /// Active database connection (None if closed)
    connection: Option<Connection>,
}

impl DatabaseHandle {
    /// Creates a closed handle remembering `path` as its database file
    pub fn new(path: impl Into<String>) -> Self {
        DatabaseHandle {
            path: path.into(),
            connection: None,
        }
    }

    /// Creates a handle and, when `auto` is set, opens `path` right away
    ///
    /// A failed eager open leaves the handle closed; see [`DatabaseHandle::open`].
    pub fn with_auto_open(path: impl Into<String>, auto: bool) -> Self {
        let mut handle = DatabaseHandle::new(path);
        if auto {
            handle.open(None);
        }
        handle
    }

    /// Opens the database at `db_path`, or at the remembered path if `None`
    ///
    /// An already open connection is committed and closed first. Failure to
    /// obtain a connection is logged and reported as `false`, never raised.
    ///
    /// # Examples
    ///
    /// ```
    /// use managedb::core::db::DatabaseHandle;
    ///
    /// let mut handle = DatabaseHandle::new(":memory:");
    /// assert!(handle.open(None));
    /// assert!(handle.is_open());
    /// ```
    pub fn open(&mut self, db_path: Option<&str>) -> bool {
        if let Some(path) = db_path {
            self.path = path.to_string();
        }

        if let Err(e) = self.close() {
            warn!("Failed to close previous database before reopening: {}", e);
        }

        match connect(&self.path) {
            Ok(conn) => {
                info!("Opened database '{}'", self.path);
                self.connection = Some(conn);
                true
            }
            Err(e) => {
                warn!("Failed to open database '{}': {}", self.path, e);
                false
            }
        }
    }

    /// Commits outstanding work and releases the connection
    ///
    /// Closing a closed handle is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(conn) = self.connection.take() else {
            return Ok(());
        };

        commit_pending(&conn)?;
        conn.close().map_err(|(_, e)| ManageDbError::Database(e))?;
        info!("Closed database '{}'", self.path);
        Ok(())
    }

    /// Checks if there's an active database connection
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// The database path this handle opens
    pub fn path(&self) -> &str {
        &self.path
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(ManageDbError::NotOpen)
    }

    /// Creates `table` with the given fields
    ///
    /// Bare names are declared `TEXT`. Name conflicts are reported by SQLite.
    pub fn create(&self, table: &str, fields: &[FieldSpec]) -> Result<()> {
        let request = statement::create_table_sql(table, fields)?;
        self.run(&request)
    }

    /// Lists the names of all user tables
    pub fn list_tables(&self) -> Result<Vec<String>> {
        schema::list_tables(self.connection()?)
    }

    /// Lists the column names of `table` in declaration order
    pub fn list_fields(&self, table: &str) -> Result<Vec<String>> {
        schema::list_fields(self.connection()?, table)
    }

    /// Describes the columns of `table`, including declared types
    pub fn describe(&self, table: &str) -> Result<Vec<Column>> {
        schema::describe_table(self.connection()?, table)
    }

    /// Executes an arbitrary statement, optionally with bound values, and commits
    ///
    /// Any rows the statement produces are discarded; use [`DatabaseHandle::get`]
    /// to read rows. SQLite errors are returned unmodified.
    pub fn execute(&self, sql: &str, values: Option<&[Value]>) -> Result<()> {
        let conn = self.connection()?;
        debug!("Executing: {}", sql);

        {
            let mut stmt = conn.prepare(sql)?;
            let params = rusqlite::params_from_iter(values.unwrap_or_default().iter());
            let mut rows = stmt.query(params)?;
            while rows.next()?.is_some() {}
        }

        commit_pending(conn)
    }

    /// Inserts one row built from the given column/value mapping
    pub fn set(&self, table: &str, assignments: &Assignments) -> Result<()> {
        let request = statement::insert_sql(table, assignments)?;
        self.run(&request)
    }

    /// Returns every row of `table`, restricted to `fields` when given
    pub fn get(&self, table: &str, fields: Option<&[String]>) -> Result<Vec<Record>> {
        let conn = self.connection()?;
        let request = statement::select_sql(table, fields);
        debug!("Querying: {}", request.sql);

        let mut stmt = conn.prepare(&request.sql)?;
        Ok(collect_records(&mut stmt, &request.values)?)
    }

    /// Deletes the rows matching every column/value condition
    ///
    /// Returns the number of rows deleted.
    pub fn delete(&self, table: &str, conditions: &Assignments) -> Result<usize> {
        let conn = self.connection()?;
        let request = statement::delete_sql(table, conditions)?;
        debug!("Executing: {}", request.sql);

        let deleted = conn.execute(
            &request.sql,
            rusqlite::params_from_iter(request.values.iter()),
        )?;
        commit_pending(conn)?;
        Ok(deleted)
    }

    fn run(&self, request: &SqlRequest) -> Result<()> {
        self.execute(&request.sql, Some(&request.values))
    }
}

impl Drop for DatabaseHandle {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close database '{}': {}", self.path, e);
        }
    }
}

/// Opens a connection and applies the connection-level pragmas
fn connect(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Commits an explicit transaction left open on the connection, if any
fn commit_pending(conn: &Connection) -> Result<()> {
    if !conn.is_autocommit() {
        debug!("Committing open transaction");
        conn.execute_batch("COMMIT")?;
    }
    Ok(())
}
