use deadpool_sqlite::rusqlite;
use deadpool_sqlite::rusqlite::types::Value;
use deadpool_sqlite::rusqlite::{Statement, ToSql};

use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Extract a `DbValue` from a `SQLite` row.
///
/// # Errors
/// Returns `StoreError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<DbValue, StoreError> {
    let value: Value = row.get(idx).map_err(StoreError::SqliteError)?;
    Ok(match value {
        Value::Null => DbValue::Null,
        Value::Integer(i) => DbValue::Int(i),
        Value::Real(f) => DbValue::Float(f),
        Value::Text(s) => DbValue::Text(s),
        Value::Blob(b) => DbValue::Blob(b),
    })
}

/// Run a prepared statement and collect its rows into a `ResultSet`.
///
/// Works for SELECT and for DML carrying a RETURNING clause; statements that
/// return no rows produce an empty set.
///
/// # Errors
/// Returns `StoreError` if execution or extraction fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, StoreError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(8);
    result_set.set_column_names(std::sync::Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}
