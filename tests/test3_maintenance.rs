#![cfg(feature = "sqlite")]

use std::time::Duration;

use bookswap_store::maintenance::{MaintenanceScheduler, PruneSpec, Routine, TrimSpec};
use bookswap_store::prelude::*;
use chrono::Utc;
use tempfile::tempdir;
use tokio::time::sleep;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn store_with_schema(prefix: &str) -> DataStore {
    let store = DataStore::new_sqlite(&unique_db_path(prefix), 4)
        .await
        .expect("sqlite store");
    let mut bootstrap = Bootstrap::new();
    bootstrap.apply_schema(&store).await.expect("schema");
    bootstrap.seed(&store).await.expect("seed");
    store
}

fn user_fields(email: &str, verified: bool, age_secs: i64) -> FieldMap {
    let created = Utc::now().naive_utc() - chrono::Duration::seconds(age_secs);
    FieldMap::new()
        .set("email", email)
        .set("password_hash", "x")
        .set("display_name", email)
        .set("verified", verified)
        .set("created_at", created)
}

fn message_fields(listing_id: i64, body: &str, age_secs: i64) -> FieldMap {
    let created = Utc::now().naive_utc() - chrono::Duration::seconds(age_secs);
    FieldMap::new()
        .set("listing_id", listing_id)
        .set("sender_id", 1i64)
        .set("recipient_id", 2i64)
        .set("body", body)
        .set("created_at", created)
}

fn unverified_prune(threshold_secs: i64) -> Routine {
    Routine::Prune(PruneSpec {
        name: "unverified_accounts",
        table: "users".to_string(),
        timestamp_column: "created_at".to_string(),
        max_age_secs: threshold_secs,
        extra_predicate: Some("verified = false".to_string()),
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn prune_respects_the_threshold_boundary() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("prune_boundary").await;

    // threshold 3600s: one second past goes, one second shy stays
    store.create("users", &user_fields("old@x.edu", false, 3601)).await?;
    store.create("users", &user_fields("fresh@x.edu", false, 3599)).await?;
    store.create("users", &user_fields("ok@x.edu", true, 7200)).await?;

    let removed = unverified_prune(3600).run(&store).await?;
    assert_eq!(removed, 1);

    let survivors = store.list("users", Some(&OrderBy::asc("email"))).await?;
    let emails: Vec<&str> = survivors
        .iter()
        .map(|r| r.get("email").unwrap().as_text().unwrap())
        .collect();
    assert_eq!(emails, vec!["fresh@x.edu", "ok@x.edu"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn prune_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("prune_idempotent").await;

    store.create("users", &user_fields("old@x.edu", false, 9000)).await?;

    let routine = unverified_prune(3600);
    assert_eq!(routine.run(&store).await?, 1);
    // running it again right away deletes nothing further
    assert_eq!(routine.run(&store).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn trim_keeps_the_most_recent_per_owner() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("trim_history").await;

    for age in [500, 400, 300, 200, 100] {
        store
            .create("messages", &message_fields(1, &format!("l1-{age}"), age))
            .await?;
    }
    store.create("messages", &message_fields(2, "l2-a", 50)).await?;
    store.create("messages", &message_fields(2, "l2-b", 40)).await?;

    let routine = Routine::Trim(TrimSpec {
        name: "message_history",
        table: "messages".to_string(),
        owner_column: "listing_id".to_string(),
        timestamp_column: "created_at".to_string(),
        keep: 3,
    });
    assert_eq!(routine.run(&store).await?, 2);

    let l1 = store
        .list_by_fields(
            "messages",
            &FieldMap::new().set("listing_id", 1i64),
            Some(&OrderBy::asc("id")),
        )
        .await?;
    let bodies: Vec<&str> = l1
        .iter()
        .map(|r| r.get("body").unwrap().as_text().unwrap())
        .collect();
    // the three newest survive, the two oldest are gone
    assert_eq!(bodies, vec!["l1-300", "l1-200", "l1-100"]);

    // the other conversation was under the cap and is untouched
    let l2 = store
        .list_by_fields("messages", &FieldMap::new().set("listing_id", 2i64), None)
        .await?;
    assert_eq!(l2.len(), 2);

    // a second pass removes nothing
    assert_eq!(routine.run(&store).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduler_runs_routines_and_isolates_failures() -> Result<(), Box<dyn std::error::Error>> {
    // surface the scheduler's warn/info lines in test output
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let store = store_with_schema("scheduler_isolation").await;

    store.create("users", &user_fields("old@x.edu", false, 9000)).await?;

    // the first routine targets a table that does not exist and fails every
    // tick; the second must still run in the same tick
    let routines = vec![
        Routine::Prune(PruneSpec {
            name: "broken",
            table: "no_such_table".to_string(),
            timestamp_column: "created_at".to_string(),
            max_age_secs: 0,
            extra_predicate: None,
        }),
        unverified_prune(3600),
    ];

    let scheduler = MaintenanceScheduler::spawn(store.clone(), Duration::from_millis(50), routines);
    sleep(Duration::from_millis(300)).await;
    scheduler.shutdown().await;

    let users = store.list("users", None).await?;
    assert!(users.is_empty());
    Ok(())
}
