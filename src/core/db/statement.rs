/// Statement Building Module
///
/// Assembles the CREATE/INSERT/SELECT/DELETE statements issued by the
/// database handle. Table and column names are always quoted as
/// identifiers and values are always bound as parameters.

use crate::core::{ManageDbError, Result};
use indexmap::IndexMap;
use rusqlite::types::Value;

/// Declared type given to fields created without an explicit type
pub const DEFAULT_COLUMN_TYPE: &str = "TEXT";

/// Ordered mapping of column name to value, used by `set` and `delete`
pub type Assignments = IndexMap<String, Value>;

/// A field of a table to create: a bare name or a name with a declared type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// Column declared with the default `TEXT` type
    Name(String),
    /// Column declared with an explicit type
    Typed { name: String, column_type: String },
}

impl FieldSpec {
    /// Column name
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::Name(name) => name,
            FieldSpec::Typed { name, .. } => name,
        }
    }

    /// Declared type; `TEXT` for a bare name
    pub fn column_type(&self) -> &str {
        match self {
            FieldSpec::Name(_) => DEFAULT_COLUMN_TYPE,
            FieldSpec::Typed { column_type, .. } => column_type,
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        FieldSpec::Name(name.to_string())
    }
}

impl From<(&str, &str)> for FieldSpec {
    fn from((name, column_type): (&str, &str)) -> Self {
        FieldSpec::Typed {
            name: name.to_string(),
            column_type: column_type.to_string(),
        }
    }
}

/// A statement ready to run: SQL text plus the values bound to its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRequest {
    pub sql: String,
    pub values: Vec<Value>,
}

impl SqlRequest {
    fn new(sql: String, values: Vec<Value>) -> Self {
        SqlRequest { sql, values }
    }
}

/// Quotes a SQLite identifier with double quotes.
///
/// Embedded double quotes are doubled (`"` → `""`), so the result always
/// names a single identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Declared types cannot be quoted, so only a conservative character set is accepted.
///
/// Commas may only appear inside a single balanced `(...)` group, as in
/// `DECIMAL(10,2)`, so a type can never end its column definition.
fn validate_column_type(column_type: &str) -> Result<()> {
    let mut depth = 0u32;
    let mut valid = !column_type.trim().is_empty();

    for c in column_type.chars() {
        if !valid {
            break;
        }
        valid = match c {
            '(' if depth == 0 => {
                depth += 1;
                true
            }
            ')' if depth == 1 => {
                depth -= 1;
                true
            }
            ',' => depth == 1,
            '_' | ' ' => true,
            c => c.is_ascii_alphanumeric(),
        };
    }

    if valid && depth == 0 {
        Ok(())
    } else {
        Err(ManageDbError::Query(format!(
            "Invalid column type '{}'",
            column_type
        )))
    }
}

/// Builds `CREATE TABLE "<table>" ("<col>" <type>, ...)`
pub fn create_table_sql(table: &str, fields: &[FieldSpec]) -> Result<SqlRequest> {
    if fields.is_empty() {
        return Err(ManageDbError::Input(format!(
            "Table '{}' needs at least one field",
            table
        )));
    }

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        validate_column_type(field.column_type())?;
        columns.push(format!(
            "{} {}",
            quote_identifier(field.name()),
            field.column_type()
        ));
    }

    let sql = format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table),
        columns.join(", ")
    );
    Ok(SqlRequest::new(sql, Vec::new()))
}

/// Builds `INSERT INTO "<table>"("<c1>", ...) VALUES (?1, ...)`
pub fn insert_sql(table: &str, assignments: &Assignments) -> Result<SqlRequest> {
    if assignments.is_empty() {
        return Err(ManageDbError::Input(format!(
            "No field=value couples given for table '{}'",
            table
        )));
    }

    let columns: Vec<String> = assignments.keys().map(|k| quote_identifier(k)).collect();
    let placeholders: Vec<String> = (1..=assignments.len()).map(|i| format!("?{}", i)).collect();

    let sql = format!(
        "INSERT INTO {}({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(SqlRequest::new(sql, assignments.values().cloned().collect()))
}

/// Builds `SELECT <fields|*> FROM "<table>"`; no fields means all columns
pub fn select_sql(table: &str, fields: Option<&[String]>) -> SqlRequest {
    let projection = match fields {
        Some(fields) if !fields.is_empty() => fields
            .iter()
            .map(|f| quote_identifier(f))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "*".to_string(),
    };

    SqlRequest::new(
        format!("SELECT {} FROM {}", projection, quote_identifier(table)),
        Vec::new(),
    )
}

/// Builds `DELETE FROM "<table>" WHERE "<k1>" = ?1 AND ...`
///
/// An empty condition set is rejected rather than deleting every row.
pub fn delete_sql(table: &str, conditions: &Assignments) -> Result<SqlRequest> {
    if conditions.is_empty() {
        return Err(ManageDbError::Input(format!(
            "No field=value couples identify the rows to delete from '{}'",
            table
        )));
    }

    let predicate = conditions
        .keys()
        .enumerate()
        .map(|(i, k)| format!("{} = ?{}", quote_identifier(k), i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        quote_identifier(table),
        predicate
    );
    Ok(SqlRequest::new(sql, conditions.values().cloned().collect()))
}
