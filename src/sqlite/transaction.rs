use deadpool_sqlite::Object;
use deadpool_sqlite::rusqlite;
use deadpool_sqlite::rusqlite::types::Value;

use crate::error::StoreError;

/// Run a sequence of pre-bound statements inside one `SQLite` transaction.
///
/// The whole batch runs in a single worker hop: all statements commit
/// together, and the first failure rolls back everything executed so far.
///
/// # Errors
/// Returns `StoreError` if any statement or the commit fails.
pub async fn run_transaction(
    conn: &Object,
    statements: Vec<(String, Vec<Value>)>,
) -> Result<Vec<usize>, StoreError> {
    conn.interact(move |conn| {
        let tx = conn.transaction()?;
        let mut counts = Vec::with_capacity(statements.len());
        for (sql, values) in &statements {
            let mut stmt = tx.prepare(sql)?;
            counts.push(stmt.execute(rusqlite::params_from_iter(values.iter()))?);
        }
        tx.commit()?;
        Ok(counts)
    })
    .await?
}
