mod dml;
mod select;

use tracing::error;

use crate::config::{DatabaseSettings, StoreConfig};
use crate::error::StoreError;
use crate::placeholders::bind_markers;
use crate::pool::connection::StatementExecutor;
use crate::pool::{StoreConnection, StorePool};
use crate::results::ResultSet;
use crate::types::{DatabaseType, DbValue, QueryAndParams};

/// The data-access engine handed to every domain service at startup.
///
/// One explicitly constructed instance wraps the bounded pool; services hold
/// clones (cheap, reference-counted) rather than reaching for globals. Every
/// operation leases a connection around a single statement execution and
/// releases it unconditionally.
#[derive(Clone, Debug)]
pub struct DataStore {
    pool: StorePool,
    db_type: DatabaseType,
}

impl DataStore {
    /// Connect according to environment-sourced settings.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` or `StoreError::ConnectionError`
    /// when the pool cannot be built.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        match &config.database {
            #[cfg(feature = "postgres")]
            DatabaseSettings::Postgres {
                host,
                port,
                user,
                password,
                dbname,
            } => {
                let pool =
                    crate::postgres::build_pool(host, *port, user, password, dbname, config.pool_size)?;
                Ok(Self {
                    pool: StorePool::Postgres(pool),
                    db_type: DatabaseType::Postgres,
                })
            }
            #[cfg(feature = "sqlite")]
            DatabaseSettings::Sqlite { path } => Self::new_sqlite(path, config.pool_size).await,
        }
    }

    /// Build a store over a `SQLite` database file (or `:memory:`).
    ///
    /// # Errors
    /// Returns `StoreError::ConnectionError` if pool creation fails.
    #[cfg(feature = "sqlite")]
    pub async fn new_sqlite(path: &str, pool_size: usize) -> Result<Self, StoreError> {
        let pool = crate::sqlite::build_pool(path, pool_size).await?;
        Ok(Self {
            pool: StorePool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
        })
    }

    /// Build a store over a Postgres endpoint.
    ///
    /// # Errors
    /// Returns `StoreError::ConfigError` or `StoreError::ConnectionError`
    /// when the pool cannot be built.
    #[cfg(feature = "postgres")]
    pub fn new_postgres(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        dbname: &str,
        pool_size: usize,
    ) -> Result<Self, StoreError> {
        let pool = crate::postgres::build_pool(host, port, user, password, dbname, pool_size)?;
        Ok(Self {
            pool: StorePool::Postgres(pool),
            db_type: DatabaseType::Postgres,
        })
    }

    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    #[must_use]
    pub fn pool(&self) -> &StorePool {
        &self.pool
    }

    /// Drain the pool for clean process exit; in-flight leases finish,
    /// subsequent acquires fail.
    pub fn shutdown(&self) {
        self.pool.close();
    }

    /// Raw escape hatch: run one row-returning statement with `?` markers.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn query(&self, sql: &str, params: &[DbValue]) -> Result<ResultSet, StoreError> {
        let mut conn = self.pool.get_connection().await?;
        run_select(&mut conn, sql, params).await
    }

    /// Raw escape hatch: run one DML statement, returning rows affected.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn execute(&self, sql: &str, params: &[DbValue]) -> Result<usize, StoreError> {
        let mut conn = self.pool.get_connection().await?;
        run_dml(&mut conn, sql, params).await
    }

    /// Run a multi-statement script (no parameters) in one batch.
    ///
    /// # Errors
    /// Propagates pool and driver errors.
    pub async fn execute_batch(&self, script: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get_connection().await?;
        match conn.execute_batch(script).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(statement = %script, error = %e, "batch execution failed");
                Err(e)
            }
        }
    }

    /// Run statements one after another on a single leased connection.
    ///
    /// This is **not** atomic: each statement commits independently, and a
    /// failure partway through leaves earlier statements applied. Use
    /// [`DataStore::execute_transaction`] where atomicity matters.
    ///
    /// # Errors
    /// Propagates the first statement failure.
    pub async fn execute_many(
        &self,
        statements: &[QueryAndParams],
    ) -> Result<Vec<usize>, StoreError> {
        let mut conn = self.pool.get_connection().await?;
        let mut counts = Vec::with_capacity(statements.len());
        for statement in statements {
            counts.push(run_dml(&mut conn, &statement.query, &statement.params).await?);
        }
        Ok(counts)
    }

    /// Run statements inside one database transaction: all commit together,
    /// the first failure rolls back everything.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors; on error nothing from
    /// the batch remains applied.
    pub async fn execute_transaction(
        &self,
        statements: &[QueryAndParams],
    ) -> Result<Vec<usize>, StoreError> {
        let mut conn = self.pool.get_connection().await?;
        let style = conn.placeholder_style();

        match &mut conn {
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(client) => {
                let tx = crate::postgres::begin_transaction(client).await?;
                let mut counts = Vec::with_capacity(statements.len());
                for statement in statements {
                    let bound = bind_markers(&statement.query, style, statement.params.len())?;
                    let prepared = tx.prepare(bound.as_ref()).await?;
                    match tx.execute_prepared(&prepared, &statement.params).await {
                        Ok(count) => counts.push(count),
                        Err(e) => {
                            error!(statement = %bound, error = %e, "transaction statement failed");
                            tx.rollback().await?;
                            return Err(e);
                        }
                    }
                }
                tx.commit().await?;
                Ok(counts)
            }
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(object) => {
                let mut bound_statements = Vec::with_capacity(statements.len());
                for statement in statements {
                    let bound = bind_markers(&statement.query, style, statement.params.len())?;
                    let values = crate::sqlite::Params::convert(&statement.params)?.0;
                    bound_statements.push((bound.into_owned(), values));
                }
                crate::sqlite::run_transaction(object, bound_statements).await
            }
        }
    }
}

/// Bind markers for the connection's dialect, run the statement, and log a
/// failure with full statement text and parameters before propagating it.
pub(crate) async fn run_select(
    conn: &mut StoreConnection,
    sql: &str,
    params: &[DbValue],
) -> Result<ResultSet, StoreError> {
    let bound = bind_markers(sql, conn.placeholder_style(), params.len())?;
    match conn.execute_select(bound.as_ref(), params).await {
        Ok(result_set) => Ok(result_set),
        Err(e) => {
            error!(statement = %bound, params = ?params, error = %e, "statement failed");
            Err(e)
        }
    }
}

pub(crate) async fn run_dml(
    conn: &mut StoreConnection,
    sql: &str,
    params: &[DbValue],
) -> Result<usize, StoreError> {
    let bound = bind_markers(sql, conn.placeholder_style(), params.len())?;
    match conn.execute_dml(bound.as_ref(), params).await {
        Ok(count) => Ok(count),
        Err(e) => {
            error!(statement = %bound, params = ?params, error = %e, "statement failed");
            Err(e)
        }
    }
}
