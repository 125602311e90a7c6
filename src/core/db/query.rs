/// Query Results Module
///
/// Rows returned by the database handle and helpers to display them.

use rusqlite::types::Value;
use rusqlite::Statement;

/// One row of a query result, in column order, with the store's native types
pub type Record = Vec<Value>;

/// Runs a prepared statement with the given parameters and collects every row
pub(crate) fn collect_records(stmt: &mut Statement, values: &[Value]) -> rusqlite::Result<Vec<Record>> {
    let column_count = stmt.column_count();
    let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), |row| {
        let mut record = Vec::with_capacity(column_count);
        for i in 0..column_count {
            record.push(row.get::<_, Value>(i)?);
        }
        Ok(record)
    })?;

    rows.collect()
}

/// Formats a SQLite value for display
///
/// # Arguments
///
/// * `value` - Database value to format
///
/// # Returns
///
/// A string representation of the value suitable for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}

/// Formats a record as a parenthesised tuple, quoting text values
pub fn format_record(record: &Record) -> String {
    let values: Vec<String> = record
        .iter()
        .map(|value| match value {
            Value::Text(t) => format!("'{}'", t),
            other => format_value(other),
        })
        .collect();
    format!("({})", values.join(", "))
}
