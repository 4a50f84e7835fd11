//! Schema bootstrap and static seeding.
//!
//! Runs once at process start: applies every table's idempotent DDL in
//! dependency order, seeds the designated lookup tables when (and only
//! when) they are empty, then hands off to the maintenance scheduler.

mod seed;
mod tables;

pub use seed::parse_reference_rows;
pub use tables::{TABLES, TableDef};

use tracing::{error, info};

use crate::config::MaintenanceSettings;
use crate::error::StoreError;
use crate::maintenance::{MaintenanceScheduler, standard_routines};
use crate::query_builder::seed_insert_statement;
use crate::store::DataStore;
use crate::types::{DatabaseType, QueryAndParams};

/// Bootstrap progress. Transitions run strictly forward; a DDL failure
/// leaves the process without a usable schema and is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Uninitialized,
    SchemaApplied,
    Seeded,
    PruningScheduled,
}

/// What seeding did per lookup table.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SeedReport {
    pub seeded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Drives the once-per-process bootstrap sequence.
#[derive(Debug)]
pub struct Bootstrap {
    state: BootstrapState,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: BootstrapState::Uninitialized,
        }
    }

    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Apply every table's DDL in dependency order. Scripts use
    /// `CREATE TABLE IF NOT EXISTS`, so re-running against an initialized
    /// database is a no-op.
    ///
    /// # Errors
    /// Any DDL failure aborts with `StoreError::SchemaError` naming the
    /// table; partial schema is not an acceptable running state.
    pub async fn apply_schema(&mut self, store: &DataStore) -> Result<(), StoreError> {
        self.expect_state(BootstrapState::Uninitialized, "apply_schema")?;

        for table in TABLES {
            let ddl = dialect_ddl(table, store.db_type());
            store.execute_batch(ddl).await.map_err(|e| {
                StoreError::SchemaError(format!("DDL for table {} failed: {e}", table.name))
            })?;
        }

        info!(tables = TABLES.len(), "schema applied");
        self.state = BootstrapState::SchemaApplied;
        Ok(())
    }

    /// Seed each designated lookup table from its bundled reference data,
    /// only if the table is empty. Seeding never overwrites existing rows,
    /// even when the bundled data has changed since.
    ///
    /// A failing table is logged and left unseeded; siblings still seed and
    /// bootstrap proceeds.
    ///
    /// # Errors
    /// Returns `StoreError::SchemaError` only when called out of order.
    pub async fn seed(&mut self, store: &DataStore) -> Result<SeedReport, StoreError> {
        self.expect_state(BootstrapState::SchemaApplied, "seed")?;

        let mut report = SeedReport::default();
        for table in TABLES {
            let Some(csv) = table.seed_csv else {
                continue;
            };
            match seed_table(store, table.name, csv).await {
                Ok(true) => report.seeded.push(table.name.to_string()),
                Ok(false) => report.skipped.push(table.name.to_string()),
                Err(e) => {
                    error!(table = table.name, error = %e, "seeding failed; table left unseeded");
                    report.failed.push(table.name.to_string());
                }
            }
        }

        self.state = BootstrapState::Seeded;
        Ok(report)
    }

    /// Spawn the maintenance scheduler with the standard routine catalogue
    /// and finish the bootstrap sequence.
    ///
    /// # Errors
    /// Returns `StoreError::SchemaError` when called out of order.
    pub fn schedule_pruning(
        &mut self,
        store: &DataStore,
        settings: &MaintenanceSettings,
    ) -> Result<MaintenanceScheduler, StoreError> {
        self.expect_state(BootstrapState::Seeded, "schedule_pruning")?;

        let scheduler = MaintenanceScheduler::spawn(
            store.clone(),
            std::time::Duration::from_secs(settings.interval_secs),
            standard_routines(settings),
        );
        self.state = BootstrapState::PruningScheduled;
        Ok(scheduler)
    }

    fn expect_state(&self, expected: BootstrapState, step: &str) -> Result<(), StoreError> {
        if self.state != expected {
            return Err(StoreError::SchemaError(format!(
                "{step} called in state {:?}, expected {expected:?}",
                self.state
            )));
        }
        Ok(())
    }
}

/// Run the whole bootstrap sequence: schema, seeds, pruning handoff.
///
/// # Errors
/// Returns `StoreError::SchemaError` on any DDL failure.
pub async fn run(
    store: &DataStore,
    settings: &MaintenanceSettings,
) -> Result<(MaintenanceScheduler, SeedReport), StoreError> {
    let mut bootstrap = Bootstrap::new();
    bootstrap.apply_schema(store).await?;
    let report = bootstrap.seed(store).await?;
    let scheduler = bootstrap.schedule_pruning(store, settings)?;
    Ok((scheduler, report))
}

fn dialect_ddl(table: &TableDef, db_type: DatabaseType) -> &'static str {
    match db_type {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => table.postgres_ddl,
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => table.sqlite_ddl,
    }
}

/// Returns `Ok(true)` if the table was seeded, `Ok(false)` if it already
/// had rows.
async fn seed_table(store: &DataStore, table: &str, csv: &str) -> Result<bool, StoreError> {
    let count_rows = store
        .query(&format!("SELECT COUNT(*) AS n FROM {table}"), &[])
        .await?;
    let existing = count_rows
        .rows
        .first()
        .and_then(|row| row.get("n"))
        .and_then(|v| v.as_int())
        .copied()
        .unwrap_or(0);
    if existing > 0 {
        return Ok(false);
    }

    let rows = parse_reference_rows(csv)?;
    let mut statements = Vec::with_capacity(rows.len());
    for fields in &rows {
        let built = seed_insert_statement(table, fields)?;
        statements.push(QueryAndParams::new(built.sql, built.params));
    }
    // one transaction per table: a failed seed leaves the table unseeded,
    // not half-seeded
    store.execute_transaction(&statements).await?;
    info!(table, rows = rows.len(), "lookup table seeded");
    Ok(true)
}
