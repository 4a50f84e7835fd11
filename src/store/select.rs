use super::{DataStore, run_select};
use crate::error::StoreError;
use crate::fields::{FieldMap, OrderBy};
use crate::query_builder::select_statement;
use crate::results::{Record, ResultSet};
use crate::types::DbValue;

impl DataStore {
    /// Fetch one row by its `id` column. Absence is `None`, not an error;
    /// callers that require existence raise their own domain error.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn get_by_id(&self, table: &str, id: i64) -> Result<Option<Record>, StoreError> {
        let filter = FieldMap::new().set("id", id);
        self.get_by_fields(table, &filter).await
    }

    /// Fetch the first row matching every entry of `filter` (AND-ed).
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn get_by_fields(
        &self,
        table: &str,
        filter: &FieldMap,
    ) -> Result<Option<Record>, StoreError> {
        let built = select_statement(table, filter, None, None, &[])?;
        Ok(self.run(&built.sql, &built.params).await?.into_first())
    }

    /// Fetch the first row matching a caller-supplied WHERE fragment.
    ///
    /// The fragment is a trusted internal string; its `?` markers bind
    /// `params` in order.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn get_custom(
        &self,
        table: &str,
        where_expr: &str,
        params: &[DbValue],
    ) -> Result<Option<Record>, StoreError> {
        let built = select_statement(table, &FieldMap::new(), Some(where_expr), None, params)?;
        Ok(self.run(&built.sql, &built.params).await?.into_first())
    }

    /// List every row, optionally ordered. An empty table yields an empty
    /// vector, never an absence value.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn list(
        &self,
        table: &str,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Record>, StoreError> {
        self.list_by_fields(table, &FieldMap::new(), order).await
    }

    /// List rows matching every entry of `filter`; zero fields degrade to
    /// the full-list semantics of [`DataStore::list`].
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn list_by_fields(
        &self,
        table: &str,
        filter: &FieldMap,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Record>, StoreError> {
        let built = select_statement(table, filter, None, order, &[])?;
        Ok(self.run(&built.sql, &built.params).await?.rows)
    }

    /// List rows matching a caller-supplied WHERE fragment.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn list_custom(
        &self,
        table: &str,
        where_expr: &str,
        order: Option<&OrderBy>,
        params: &[DbValue],
    ) -> Result<Vec<Record>, StoreError> {
        let built = select_statement(table, &FieldMap::new(), Some(where_expr), order, params)?;
        Ok(self.run(&built.sql, &built.params).await?.rows)
    }

    async fn run(&self, sql: &str, params: &[DbValue]) -> Result<ResultSet, StoreError> {
        let mut conn = self.pool().get_connection().await?;
        run_select(&mut conn, sql, params).await
    }
}
