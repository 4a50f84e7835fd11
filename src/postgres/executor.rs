use deadpool_postgres::Object;

use super::params::Params;
use super::query::build_result_set_from_rows;
use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Execute a multi-statement script (no parameters) as one batch.
///
/// # Errors
/// Returns errors from batch execution.
pub async fn execute_batch(client: &mut Object, script: &str) -> Result<(), StoreError> {
    client.batch_execute(script).await?;
    Ok(())
}

/// Execute a row-returning statement (SELECT, or DML with RETURNING).
///
/// # Errors
/// Returns errors from parameter conversion, execution, or result building.
pub async fn execute_select(
    client: &mut Object,
    query: &str,
    params: &[DbValue],
) -> Result<ResultSet, StoreError> {
    let converted = Params::convert(params)?;
    let rows = client.query(query, converted.as_refs()).await?;
    build_result_set_from_rows(&rows)
}

/// Execute a DML statement and return the affected-row count.
///
/// # Errors
/// Returns errors from parameter conversion or execution.
pub async fn execute_dml(
    client: &mut Object,
    query: &str,
    params: &[DbValue],
) -> Result<usize, StoreError> {
    let converted = Params::convert(params)?;
    let rows = client.execute(query, converted.as_refs()).await?;
    usize::try_from(rows)
        .map_err(|e| StoreError::ExecutionError(format!("invalid rows affected count: {e}")))
}
