use deadpool::managed::PoolConfig;
use deadpool_sqlite::{Config as SqliteConfig, Runtime};

use crate::error::StoreError;

/// Build the bounded `SQLite` pool and apply the WAL pragma once.
///
/// # Errors
/// Returns `StoreError::ConnectionError` if pool creation or the initial
/// smoke test fails.
pub async fn build_pool(path: &str, pool_size: usize) -> Result<deadpool_sqlite::Pool, StoreError> {
    let mut cfg = SqliteConfig::new(path);
    cfg.pool = Some(PoolConfig::new(pool_size));

    let pool = cfg
        .create_pool(Runtime::Tokio1)
        .map_err(|e| StoreError::ConnectionError(format!("Failed to create SQLite pool: {e}")))?;

    {
        let conn = pool.get().await.map_err(StoreError::PoolErrorSqlite)?;
        conn.interact(|conn| {
            conn.execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(StoreError::SqliteError)
        })
        .await??;
    }

    Ok(pool)
}

/// Convert `InteractError` to a more specific `StoreError`
impl From<deadpool_sqlite::InteractError> for StoreError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        StoreError::ConnectionError(format!("SQLite interact error: {err}"))
    }
}
