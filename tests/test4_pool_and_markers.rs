#![cfg(feature = "sqlite")]

use bookswap_store::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn operations_beyond_the_pool_ceiling_serialize() -> Result<(), Box<dyn std::error::Error>> {
    // ceiling of 2, far more in-flight operations than that
    let store = DataStore::new_sqlite(&unique_db_path("pool_bound"), 2).await?;
    store
        .execute_batch("CREATE TABLE IF NOT EXISTS counters (id INTEGER PRIMARY KEY AUTOINCREMENT, tag TEXT NOT NULL);")
        .await?;

    for i in 0..10 {
        store
            .execute(
                "INSERT INTO counters (tag) VALUES (?)",
                &[DbValue::Text(format!("row-{i}"))],
            )
            .await?;
    }

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let rows = store
                .query(
                    "SELECT COUNT(*) AS n FROM counters WHERE tag != ?",
                    &[DbValue::Text(format!("nope-{i}"))],
                )
                .await?;
            Ok::<i64, StoreError>(*rows.rows[0].get("n").unwrap().as_int().unwrap())
        }));
    }

    // exhaustion shows up as waiting, not as an error
    for handle in handles {
        assert_eq!(handle.await??, 10);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closed_pool_rejects_new_acquires() -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::new_sqlite(&unique_db_path("pool_close"), 2).await?;
    store.query("SELECT 1 AS one", &[]).await?;

    store.shutdown();
    assert!(store.query("SELECT 1 AS one", &[]).await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn marker_count_mismatch_fails_before_dispatch() -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::new_sqlite(&unique_db_path("marker_mismatch"), 2).await?;

    let err = store
        .query("SELECT ? AS a, ? AS b", &[DbValue::Int(1)])
        .await
        .unwrap_err();
    match err {
        StoreError::ParameterError(msg) => {
            assert!(msg.contains("2 positional markers"));
            assert!(msg.contains("SELECT ? AS a, ? AS b"));
        }
        other => panic!("expected ParameterError, got {other}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn markers_inside_literals_are_data_not_parameters()
-> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::new_sqlite(&unique_db_path("marker_literal"), 2).await?;

    let rows = store
        .query("SELECT 'really?' AS q, ? AS a", &[DbValue::Int(7)])
        .await?;
    assert_eq!(rows.rows[0].get("q").unwrap().as_text(), Some("really?"));
    assert_eq!(*rows.rows[0].get("a").unwrap().as_int().unwrap(), 7);
    Ok(())
}
