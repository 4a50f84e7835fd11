use super::{DataStore, run_dml, run_select};
use crate::error::StoreError;
use crate::fields::FieldMap;
use crate::query_builder::{delete_statement, insert_statement, update_statement};
use crate::results::Record;
use crate::types::DbValue;

impl DataStore {
    /// Insert one row and return it as stored, generated columns included.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors; also errors if the
    /// database returns no row for the insert.
    pub async fn create(&self, table: &str, fields: &FieldMap) -> Result<Record, StoreError> {
        let built = insert_statement(table, fields)?;
        let mut conn = self.pool().get_connection().await?;
        run_select(&mut conn, &built.sql, &built.params)
            .await?
            .into_first()
            .ok_or_else(|| {
                StoreError::ExecutionError(format!("insert into {table} returned no row"))
            })
    }

    /// Update one row by id, returning the updated row, or `None` when the
    /// id does not exist.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn update_by_id(
        &self,
        table: &str,
        id: i64,
        set: &FieldMap,
    ) -> Result<Option<Record>, StoreError> {
        let filter = FieldMap::new().set("id", id);
        let built = update_statement(table, &filter, None, set, &[])?;
        let mut conn = self.pool().get_connection().await?;
        Ok(run_select(&mut conn, &built.sql, &built.params)
            .await?
            .into_first())
    }

    /// Bulk update by AND-ed filter, returning every updated row.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn update_by_fields(
        &self,
        table: &str,
        filter: &FieldMap,
        set: &FieldMap,
    ) -> Result<Vec<Record>, StoreError> {
        let built = update_statement(table, filter, None, set, &[])?;
        let mut conn = self.pool().get_connection().await?;
        Ok(run_select(&mut conn, &built.sql, &built.params).await?.rows)
    }

    /// Bulk update by caller-supplied WHERE fragment.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn update_custom(
        &self,
        table: &str,
        where_expr: &str,
        set: &FieldMap,
        params: &[DbValue],
    ) -> Result<Vec<Record>, StoreError> {
        let built = update_statement(table, &FieldMap::new(), Some(where_expr), set, params)?;
        let mut conn = self.pool().get_connection().await?;
        Ok(run_select(&mut conn, &built.sql, &built.params).await?.rows)
    }

    /// Physically delete one row by id. Deleting a nonexistent id is a
    /// no-op, not an error.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn delete_by_id(&self, table: &str, id: i64) -> Result<(), StoreError> {
        let filter = FieldMap::new().set("id", id);
        self.delete_by_fields(table, &filter).await
    }

    /// Physically delete every row matching the AND-ed filter.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn delete_by_fields(&self, table: &str, filter: &FieldMap) -> Result<(), StoreError> {
        let built = delete_statement(table, filter, None, &[])?;
        let mut conn = self.pool().get_connection().await?;
        run_dml(&mut conn, &built.sql, &built.params).await?;
        Ok(())
    }

    /// Physically delete every row matching a caller-supplied WHERE
    /// fragment.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn delete_custom(
        &self,
        table: &str,
        where_expr: &str,
        params: &[DbValue],
    ) -> Result<(), StoreError> {
        let built = delete_statement(table, &FieldMap::new(), Some(where_expr), params)?;
        let mut conn = self.pool().get_connection().await?;
        run_dml(&mut conn, &built.sql, &built.params).await?;
        Ok(())
    }
}
