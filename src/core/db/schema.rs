/// Schema Introspection Module
///
/// This module provides the metadata queries used by the database handle:
/// listing tables and describing the columns of a table.

use crate::core::Result;
use rusqlite::{Connection, Row};

/// Represents a database column with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type (e.g., "INTEGER", "TEXT"); empty when none was declared
    pub type_name: String,
    /// Whether the column is declared NOT NULL
    pub notnull: bool,
    /// Default value expression (if any)
    pub dflt_value: Option<String>,
    /// Whether this column is part of the primary key
    pub pk: bool,
}

impl Column {
    /// Creates a Column from a `pragma_table_info` row
    fn from_table_info_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Column {
            name: row.get(0)?,
            type_name: row.get(1)?,
            notnull: row.get(2)?,
            dflt_value: row.get(3)?,
            pk: row.get::<_, i64>(4)? > 0,
        })
    }
}

/// Retrieves the names of all user-defined tables, in creation order
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type='table' AND substr(name, 1, 7) <> 'sqlite_'",
    )?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Retrieves the column names of `table` in declaration order.
///
/// A table that does not exist has no columns.
pub fn list_fields(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;

    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// Retrieves full column information for `table` in declaration order
pub fn describe_table(conn: &Connection, table: &str) -> Result<Vec<Column>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk
         FROM pragma_table_info(?1) ORDER BY cid",
    )?;

    let columns = stmt
        .query_map([table], Column::from_table_info_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}
