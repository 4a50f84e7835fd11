pub mod connection;

pub use connection::StoreConnection;

use crate::error::StoreError;

/// Bounded connection pool for the single database endpoint behind the store.
///
/// Cloning is cheap: the underlying deadpool handles are reference-counted,
/// so one pool instance can be wired into every domain service at startup.
#[derive(Clone)]
pub enum StorePool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(deadpool_postgres::Pool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(deadpool_sqlite::Pool),
}

impl std::fmt::Debug for StorePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").field(&"<Pool>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<Pool>").finish(),
        }
    }
}

impl StorePool {
    /// Lease a connection, waiting (without blocking other tasks) while the
    /// pool is exhausted. The lease is released when the returned handle
    /// drops, success or failure.
    ///
    /// # Errors
    /// Returns a pool error when the pool is closed or the backend cannot
    /// produce a connection.
    pub async fn get_connection(&self) -> Result<StoreConnection, StoreError> {
        match self {
            #[cfg(feature = "postgres")]
            StorePool::Postgres(pool) => {
                let conn = pool.get().await.map_err(StoreError::PoolErrorPostgres)?;
                Ok(StoreConnection::Postgres(conn))
            }
            #[cfg(feature = "sqlite")]
            StorePool::Sqlite(pool) => {
                let conn = pool.get().await.map_err(StoreError::PoolErrorSqlite)?;
                Ok(StoreConnection::Sqlite(conn))
            }
        }
    }

    /// Drain the pool; subsequent acquires fail.
    pub fn close(&self) {
        match self {
            #[cfg(feature = "postgres")]
            StorePool::Postgres(pool) => pool.close(),
            #[cfg(feature = "sqlite")]
            StorePool::Sqlite(pool) => pool.close(),
        }
    }
}
