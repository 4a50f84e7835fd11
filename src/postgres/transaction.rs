use deadpool_postgres::{Object, Transaction as PgTransaction};
use tokio_postgres::Statement;

use super::params::Params;
use super::query::build_result_set_from_rows;
use crate::error::StoreError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Lightweight transaction wrapper for Postgres.
pub struct Tx<'a> {
    tx: PgTransaction<'a>,
}

/// Prepared statement wrapper for Postgres.
pub struct Prepared {
    stmt: Statement,
}

/// Begin a new transaction on the provided connection.
///
/// # Errors
/// Returns an error if creating the transaction fails.
pub async fn begin_transaction(conn: &mut Object) -> Result<Tx<'_>, StoreError> {
    let tx = conn.transaction().await?;
    Ok(Tx { tx })
}

impl Tx<'_> {
    /// Prepare a SQL statement tied to this transaction.
    ///
    /// # Errors
    /// Returns an error if the prepare call fails.
    pub async fn prepare(&self, sql: &str) -> Result<Prepared, StoreError> {
        let stmt = self.tx.prepare(sql).await?;
        Ok(Prepared { stmt })
    }

    /// Execute a parameterized DML statement and return the affected count.
    ///
    /// # Errors
    /// Returns an error if parameter conversion or execution fails.
    pub async fn execute_prepared(
        &self,
        prepared: &Prepared,
        params: &[DbValue],
    ) -> Result<usize, StoreError> {
        let converted = Params::convert(params)?;
        let rows = self.tx.execute(&prepared.stmt, converted.as_refs()).await?;
        usize::try_from(rows)
            .map_err(|e| StoreError::ExecutionError(format!("invalid rows affected count: {e}")))
    }

    /// Execute a parameterized SELECT and return a `ResultSet`.
    ///
    /// # Errors
    /// Returns an error if parameter conversion, execution, or result
    /// building fails.
    pub async fn query_prepared(
        &self,
        prepared: &Prepared,
        params: &[DbValue],
    ) -> Result<ResultSet, StoreError> {
        let converted = Params::convert(params)?;
        let rows = self.tx.query(&prepared.stmt, converted.as_refs()).await?;
        build_result_set_from_rows(&rows)
    }

    /// Commit the transaction.
    ///
    /// # Errors
    /// Returns an error if commit fails.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll back the transaction.
    ///
    /// # Errors
    /// Returns an error if rollback fails.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
