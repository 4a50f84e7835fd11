//! Recurring maintenance: scheduled deletion of time-expired records.
//!
//! One timer drives every registered routine sequentially each tick, so two
//! routines never run concurrently and two ticks never overlap. A failing
//! routine is logged and isolated; siblings in the same tick and future
//! ticks are unaffected.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MaintenanceSettings;
use crate::error::StoreError;
use crate::store::DataStore;
use crate::types::DbValue;

/// Age-based deletion: rows whose timestamp column is at least
/// `max_age_secs` old are removed. The threshold boundary is inclusive.
#[derive(Debug, Clone)]
pub struct PruneSpec {
    pub name: &'static str,
    pub table: String,
    pub timestamp_column: String,
    pub max_age_secs: i64,
    /// Extra predicate AND-ed onto the age filter (trusted internal SQL).
    pub extra_predicate: Option<String>,
}

/// Per-owner history cap: keeps the `keep` most recent rows per owner and
/// deletes the rest.
#[derive(Debug, Clone)]
pub struct TrimSpec {
    pub name: &'static str,
    pub table: String,
    pub owner_column: String,
    pub timestamp_column: String,
    pub keep: i64,
}

/// A registered maintenance routine. Each is independently idempotent:
/// running it twice in a row deletes nothing the second time.
#[derive(Debug, Clone)]
pub enum Routine {
    Prune(PruneSpec),
    Trim(TrimSpec),
}

impl Routine {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Routine::Prune(spec) => spec.name,
            Routine::Trim(spec) => spec.name,
        }
    }

    /// Execute the routine's DELETE, returning the number of rows removed.
    ///
    /// # Errors
    /// Propagates binding, pool, and driver errors.
    pub async fn run(&self, store: &DataStore) -> Result<usize, StoreError> {
        match self {
            Routine::Prune(spec) => {
                let cutoff = Utc::now().naive_utc()
                    - chrono::Duration::seconds(spec.max_age_secs);
                let mut where_expr = format!("{} <= ?", spec.timestamp_column);
                if let Some(extra) = &spec.extra_predicate {
                    where_expr.push_str(" AND ");
                    where_expr.push_str(extra);
                }
                store
                    .execute(
                        &format!("DELETE FROM {} WHERE {where_expr}", spec.table),
                        &[DbValue::Timestamp(cutoff)],
                    )
                    .await
            }
            Routine::Trim(spec) => {
                let sql = format!(
                    "DELETE FROM {table} WHERE id IN (
                        SELECT id FROM (
                            SELECT id, ROW_NUMBER() OVER (
                                PARTITION BY {owner} ORDER BY {ts} DESC, id DESC
                            ) AS rn FROM {table}
                        ) ranked WHERE rn > ?
                    )",
                    table = spec.table,
                    owner = spec.owner_column,
                    ts = spec.timestamp_column,
                );
                store.execute(&sql, &[DbValue::Int(spec.keep)]).await
            }
        }
    }
}

/// The marketplace's standard routine catalogue, thresholds sourced from
/// configuration. Policy ownership stays with the entities; the engine only
/// executes the DELETEs these produce.
#[must_use]
pub fn standard_routines(settings: &MaintenanceSettings) -> Vec<Routine> {
    vec![
        Routine::Prune(PruneSpec {
            name: "unverified_accounts",
            table: "users".to_string(),
            timestamp_column: "created_at".to_string(),
            max_age_secs: settings.unverified_account_ttl_secs,
            extra_predicate: Some("verified = false".to_string()),
        }),
        Routine::Prune(PruneSpec {
            name: "verification_tokens",
            table: "verification_tokens".to_string(),
            timestamp_column: "created_at".to_string(),
            max_age_secs: settings.verification_token_ttl_secs,
            extra_predicate: None,
        }),
        Routine::Prune(PruneSpec {
            name: "password_reset_tokens",
            table: "password_reset_tokens".to_string(),
            timestamp_column: "created_at".to_string(),
            max_age_secs: settings.password_reset_ttl_secs,
            extra_predicate: None,
        }),
        Routine::Prune(PruneSpec {
            name: "stale_sessions",
            table: "sessions".to_string(),
            timestamp_column: "last_seen_at".to_string(),
            max_age_secs: settings.session_ttl_secs,
            extra_predicate: None,
        }),
        Routine::Trim(TrimSpec {
            name: "message_history",
            table: "messages".to_string(),
            owner_column: "listing_id".to_string(),
            timestamp_column: "created_at".to_string(),
            keep: settings.message_history_keep,
        }),
    ]
}

/// Handle to the background maintenance task.
#[derive(Debug)]
pub struct MaintenanceScheduler {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl MaintenanceScheduler {
    /// Spawn the recurring task. The first tick fires immediately, then
    /// every `period`.
    #[must_use]
    pub fn spawn(store: DataStore, period: Duration, routines: Vec<Routine>) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), routines = routines.len(), "maintenance scheduler started");

            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = ticker.tick() => run_tick(&store, &routines).await,
                }
            }
        });

        Self { handle, cancel }
    }

    /// Stop the scheduler and wait for the current tick to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

async fn run_tick(store: &DataStore, routines: &[Routine]) {
    for routine in routines {
        match routine.run(store).await {
            Ok(0) => debug!(routine = routine.name(), "nothing to prune"),
            Ok(removed) => info!(routine = routine.name(), removed, "pruned expired records"),
            Err(e) => {
                // isolated: siblings in this tick and future ticks still run
                warn!(routine = routine.name(), error = %e, "maintenance routine failed");
            }
        }
    }
}
