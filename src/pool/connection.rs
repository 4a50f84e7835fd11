use async_trait::async_trait;

use crate::error::StoreError;
use crate::placeholders::PlaceholderStyle;
use crate::results::ResultSet;
use crate::types::DbValue;

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// A leased connection, exclusively owned for the duration of one statement
/// execution and returned to the pool on drop.
pub enum StoreConnection {
    #[cfg(feature = "postgres")]
    Postgres(deadpool_postgres::Object),
    #[cfg(feature = "sqlite")]
    Sqlite(deadpool_sqlite::Object),
}

impl std::fmt::Debug for StoreConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").field(&"<Object>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<Object>").finish(),
        }
    }
}

impl StoreConnection {
    /// Positional-marker form expected by this connection's backend.
    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(_) => PlaceholderStyle::Postgres,
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(_) => PlaceholderStyle::Sqlite,
        }
    }
}

/// Statement execution over a leased connection, independent of backend.
#[async_trait]
pub trait StatementExecutor {
    /// Execute a multi-statement script with no parameters.
    async fn execute_batch(&mut self, script: &str) -> Result<(), StoreError>;

    /// Execute one row-returning statement (SELECT, or DML with RETURNING).
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[DbValue],
    ) -> Result<ResultSet, StoreError>;

    /// Execute one DML statement and return the affected-row count.
    async fn execute_dml(&mut self, query: &str, params: &[DbValue]) -> Result<usize, StoreError>;
}

#[async_trait]
impl StatementExecutor for StoreConnection {
    async fn execute_batch(&mut self, script: &str) -> Result<(), StoreError> {
        match self {
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(client) => postgres::execute_batch(client, script).await,
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(conn) => sqlite::execute_batch(conn, script).await,
        }
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[DbValue],
    ) -> Result<ResultSet, StoreError> {
        match self {
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(client) => {
                postgres::execute_select(client, query, params).await
            }
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(conn) => sqlite::execute_select(conn, query, params).await,
        }
    }

    async fn execute_dml(&mut self, query: &str, params: &[DbValue]) -> Result<usize, StoreError> {
        match self {
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(client) => postgres::execute_dml(client, query, params).await,
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(conn) => sqlite::execute_dml(conn, query, params).await,
        }
    }
}
