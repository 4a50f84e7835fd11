use deadpool_sqlite::Object;
use deadpool_sqlite::rusqlite;

use super::params::Params;
use super::query::build_result_set;
use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Execute a multi-statement script (no parameters) on the worker thread.
///
/// # Errors
/// Returns `StoreError` if execution fails.
pub async fn execute_batch(conn: &Object, script: &str) -> Result<(), StoreError> {
    let script = script.to_string();
    conn.interact(move |conn| {
        conn.execute_batch(&script)
            .map_err(StoreError::SqliteError)
    })
    .await?
}

/// Execute a row-returning statement (SELECT, or DML with RETURNING).
///
/// # Errors
/// Returns `StoreError` if execution or result processing fails.
pub async fn execute_select(
    conn: &Object,
    query: &str,
    params: &[DbValue],
) -> Result<ResultSet, StoreError> {
    let query = query.to_string();
    let values = Params::convert(params)?.0;
    conn.interact(move |conn| {
        let mut stmt = conn.prepare(&query)?;
        build_result_set(&mut stmt, &values)
    })
    .await?
}

/// Execute a DML statement and return the affected-row count.
///
/// # Errors
/// Returns `StoreError` if execution fails.
pub async fn execute_dml(
    conn: &Object,
    query: &str,
    params: &[DbValue],
) -> Result<usize, StoreError> {
    let query = query.to_string();
    let values = Params::convert(params)?.0;
    conn.interact(move |conn| {
        let mut stmt = conn.prepare(&query)?;
        let affected = stmt.execute(rusqlite::params_from_iter(values.iter()))?;
        Ok(affected)
    })
    .await?
}
