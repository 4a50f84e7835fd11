use deadpool_sqlite::rusqlite;

use crate::error::StoreError;
use crate::types::DbValue;

/// Convert a single `DbValue` to a rusqlite `Value`.
///
/// Timestamps are written in the sortable `%F %T%.f` text form so that
/// range comparisons in pruning DELETEs behave the same as on Postgres.
#[must_use]
pub fn db_value_to_sqlite_value(value: &DbValue) -> rusqlite::types::Value {
    match value {
        DbValue::Int(i) => rusqlite::types::Value::Integer(*i),
        DbValue::Float(f) => rusqlite::types::Value::Real(*f),
        DbValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        DbValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        DbValue::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        DbValue::Null => rusqlite::types::Value::Null,
        DbValue::JSON(jval) => rusqlite::types::Value::Text(jval.to_string()),
        DbValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Unified `SQLite` parameter container.
pub struct Params(pub Vec<rusqlite::types::Value>);

impl Params {
    /// Convert engine values into owned `SQLite` values.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for parity with the Postgres
    /// converter.
    pub fn convert(params: &[DbValue]) -> Result<Self, StoreError> {
        let mut values = Vec::with_capacity(params.len());
        for p in params {
            values.push(db_value_to_sqlite_value(p));
        }
        Ok(Params(values))
    }

    #[must_use]
    pub fn as_values(&self) -> &[rusqlite::types::Value] {
        &self.0
    }
}
