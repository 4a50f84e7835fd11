use deadpool_postgres::{Config as PgConfig, PoolConfig, Runtime};
use tokio_postgres::NoTls;

use crate::error::StoreError;

/// Build the bounded Postgres pool from connection settings.
///
/// # Errors
/// Returns `StoreError::ConfigError` if required fields are missing or
/// `StoreError::ConnectionError` if pool creation fails.
pub fn build_pool(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    dbname: &str,
    pool_size: usize,
) -> Result<deadpool_postgres::Pool, StoreError> {
    if dbname.is_empty() {
        return Err(StoreError::ConfigError("dbname is required".to_string()));
    }
    if user.is_empty() {
        return Err(StoreError::ConfigError("user is required".to_string()));
    }

    let mut cfg = PgConfig::new();
    cfg.host = Some(host.to_string());
    cfg.port = Some(port);
    cfg.user = Some(user.to_string());
    cfg.password = Some(password.to_string());
    cfg.dbname = Some(dbname.to_string());
    cfg.pool = Some(PoolConfig::new(pool_size));

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| StoreError::ConnectionError(format!("Failed to create Postgres pool: {e}")))
}
