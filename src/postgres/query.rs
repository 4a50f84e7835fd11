use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::coerce::MoneyCents;
use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Extract a `DbValue` from a `tokio_postgres` row at the given index.
///
/// The two scalar coercions the rest of the system depends on happen here,
/// for every row regardless of table or operation: timestamps are read as
/// UTC (`timestamptz` through `DateTime<Utc>`, never the process-local
/// zone), and `money` decodes from its cents wire form to a float of units.
///
/// # Errors
/// Returns `StoreError` if the column cannot be retrieved.
pub fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<DbValue, StoreError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Float))
        }
        "money" => {
            let val: Option<MoneyCents> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |m| DbValue::Float(m.to_units())))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Timestamp))
        }
        "timestamptz" => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |dt| DbValue::Timestamp(dt.naive_utc())))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Blob))
        }
        _ => {
            // text, varchar, char, and anything else readable as a string
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Text))
        }
    }
}

/// Build a result set from raw Postgres rows.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_rows(rows: &[tokio_postgres::Row]) -> Result<ResultSet, StoreError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(std::sync::Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}
