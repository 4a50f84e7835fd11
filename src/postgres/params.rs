use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes::BytesMut;

use crate::error::StoreError;
use crate::types::DbValue;

/// Container for Postgres parameters with lifetime tracking.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Borrow a slice of `DbValue`s as Postgres parameters.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for parity with the `SQLite`
    /// converter.
    pub fn convert(params: &'a [DbValue]) -> Result<Params<'a>, StoreError> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        Ok(Params { references })
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for DbValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            DbValue::Int(i) => (*i).to_sql(ty, out),
            DbValue::Float(f) => {
                // money travels as an int64 count of cents on the wire
                if *ty == Type::MONEY {
                    let cents = (*f * 100.0).round() as i64;
                    return cents.to_sql(&Type::INT8, out);
                }
                (*f).to_sql(ty, out)
            }
            DbValue::Text(s) => s.to_sql(ty, out),
            DbValue::Bool(b) => (*b).to_sql(ty, out),
            DbValue::Timestamp(dt) => {
                if *ty == Type::TIMESTAMPTZ {
                    return dt.and_utc().to_sql(ty, out);
                }
                dt.to_sql(ty, out)
            }
            DbValue::Null => Ok(IsNull::Yes),
            DbValue::JSON(jsval) => jsval.to_sql(ty, out),
            DbValue::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        match *ty {
            Type::INT2 | Type::INT4 | Type::INT8 => true,
            Type::FLOAT4 | Type::FLOAT8 | Type::MONEY => true,
            Type::TEXT | Type::VARCHAR | Type::CHAR | Type::NAME => true,
            Type::BOOL => true,
            Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => true,
            Type::JSON | Type::JSONB => true,
            Type::BYTEA => true,
            _ => false,
        }
    }

    to_sql_checked!();
}
