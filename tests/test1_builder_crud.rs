#![cfg(feature = "sqlite")]

use bookswap_store::prelude::*;
use chrono::NaiveDateTime;
use tempfile::tempdir;

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

fn listing_fields(title: &str, seller_id: i64) -> FieldMap {
    FieldMap::new()
        .set("seller_id", seller_id)
        .set("category_id", 1i64)
        .set("condition_id", 1i64)
        .set("title", title)
        .set("price", 19.25)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_then_get_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_roundtrip").await;

    let ts = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")?;
    let created = store
        .create(
            "listings",
            &listing_fields("Linear Algebra Done Right", 1).set("created_at", ts),
        )
        .await?;
    let id = created.id().expect("generated id");

    let fetched = store.get_by_id("listings", id).await?.expect("row exists");
    assert_eq!(
        fetched.get("title").unwrap().as_text(),
        Some("Linear Algebra Done Right")
    );
    assert_eq!(*fetched.get("seller_id").unwrap().as_int().unwrap(), 1);
    assert_eq!(fetched.get("price").unwrap().as_currency(), Some(19.25));
    // timestamps read back as UTC epoch millis regardless of host zone
    assert_eq!(
        fetched.get("created_at").unwrap().as_epoch_millis(),
        Some(1_704_067_200_000)
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_row_getters_return_none_on_absence() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_absence").await;

    assert!(store.get_by_id("listings", 9999).await?.is_none());
    assert!(
        store
            .get_by_fields("listings", &FieldMap::new().set("title", "nope"))
            .await?
            .is_none()
    );
    assert!(
        store
            .get_custom("listings", "price > ?", &[DbValue::Float(1e9)])
            .await?
            .is_none()
    );
    // list operations yield empty vectors, never an absence value
    assert!(store.list("listings", None).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn by_fields_filters_are_conjunctive() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_conjunction").await;

    store.create("listings", &listing_fields("A", 1)).await?;
    store.create("listings", &listing_fields("B", 1)).await?;
    store.create("listings", &listing_fields("A", 2)).await?;

    let filter = FieldMap::new().set("title", "A").set("seller_id", 1i64);
    let rows = store.list_by_fields("listings", &filter, None).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(*rows[0].get("seller_id").unwrap().as_int().unwrap(), 1);

    // zero fields degrade to the unfiltered full list
    let all = store
        .list_by_fields("listings", &FieldMap::new(), Some(&OrderBy::asc("id")))
        .await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].get("title").unwrap().as_text(), Some("A"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_by_id_touches_exactly_one_row() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_update").await;

    let first = store.create("listings", &listing_fields("Keep", 1)).await?;
    let second = store.create("listings", &listing_fields("Change", 1)).await?;

    let updated = store
        .update_by_id(
            "listings",
            second.id().unwrap(),
            &FieldMap::new().set("title", "Changed").set("sold", true),
        )
        .await?
        .expect("row exists");

    assert_eq!(updated.get("title").unwrap().as_text(), Some("Changed"));
    assert_eq!(updated.get("sold").unwrap().as_bool(), Some(&true));
    // non-updated columns are unchanged
    assert_eq!(updated.get("price").unwrap().as_currency(), Some(19.25));

    let untouched = store.get_by_id("listings", first.id().unwrap()).await?.unwrap();
    assert_eq!(untouched.get("title").unwrap().as_text(), Some("Keep"));

    // a nonexistent id yields absence, not an error
    let missing = store
        .update_by_id("listings", 9999, &FieldMap::new().set("sold", true))
        .await?;
    assert!(missing.is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bulk_update_returns_every_updated_row() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_bulk_update").await;

    store.create("listings", &listing_fields("A", 1)).await?;
    store.create("listings", &listing_fields("B", 1)).await?;
    store.create("listings", &listing_fields("C", 2)).await?;

    let updated = store
        .update_by_fields(
            "listings",
            &FieldMap::new().set("seller_id", 1i64),
            &FieldMap::new().set("sold", true),
        )
        .await?;
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|r| r.get("sold").unwrap().as_bool() == Some(&true)));

    let updated = store
        .update_custom(
            "listings",
            "sold = ?",
            &FieldMap::new().set("description", "gone"),
            &[DbValue::Bool(true)],
        )
        .await?;
    assert_eq!(updated.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deletes_are_physical_and_silent_on_missing_rows()
-> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_delete").await;

    let row = store.create("listings", &listing_fields("Doomed", 1)).await?;
    store.delete_by_id("listings", row.id().unwrap()).await?;
    assert!(store.get_by_id("listings", row.id().unwrap()).await?.is_none());

    // deleting an id that is already gone is a no-op
    store.delete_by_id("listings", row.id().unwrap()).await?;

    store.create("listings", &listing_fields("X", 3)).await?;
    store.create("listings", &listing_fields("Y", 3)).await?;
    store
        .delete_by_fields("listings", &FieldMap::new().set("seller_id", 3i64))
        .await?;
    assert!(store.list("listings", None).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn execute_many_is_sequential_not_atomic() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_execute_many").await;

    let statements = vec![
        QueryAndParams::new(
            "INSERT INTO book_conditions (name, rank) VALUES (?, ?)",
            vec![DbValue::Text("Water damaged".into()), DbValue::Int(6)],
        ),
        // violates the UNIQUE constraint on name
        QueryAndParams::new(
            "INSERT INTO book_conditions (name, rank) VALUES (?, ?)",
            vec![DbValue::Text("New".into()), DbValue::Int(7)],
        ),
    ];
    assert!(store.execute_many(&statements).await.is_err());

    // the first statement committed before the second failed
    let row = store
        .get_by_fields("book_conditions", &FieldMap::new().set("name", "Water damaged"))
        .await?;
    assert!(row.is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn execute_transaction_rolls_back_on_failure() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_with_schema("crud_transaction").await;

    let statements = vec![
        QueryAndParams::new(
            "INSERT INTO book_conditions (name, rank) VALUES (?, ?)",
            vec![DbValue::Text("Annotated".into()), DbValue::Int(6)],
        ),
        QueryAndParams::new(
            "INSERT INTO book_conditions (name, rank) VALUES (?, ?)",
            vec![DbValue::Text("New".into()), DbValue::Int(7)],
        ),
    ];
    assert!(store.execute_transaction(&statements).await.is_err());

    // nothing from the failed batch remains applied
    let row = store
        .get_by_fields("book_conditions", &FieldMap::new().set("name", "Annotated"))
        .await?;
    assert!(row.is_none());

    // a clean batch commits as one unit
    let statements = vec![QueryAndParams::new(
        "INSERT INTO book_conditions (name, rank) VALUES (?, ?)",
        vec![DbValue::Text("Annotated".into()), DbValue::Int(6)],
    )];
    let counts = store.execute_transaction(&statements).await?;
    assert_eq!(counts, vec![1]);
    Ok(())
}
