//! CRUD lifecycle: write through the table API, patch the cache on success,
//! leave it untouched on failure.

use std::sync::Arc;

use serde_json::json;

use classdb_core::{SessionTables, TableRegistry};
use classdb_types::TableName;

use super::common::{row, seeded_store};

#[tokio::test]
async fn test_insert_then_optimistic_patch() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session.fetch_tables(&[TableName::Students]).await.unwrap();

    let api = session
        .with_table(TableName::Students, |t| t.api.clone())
        .unwrap();
    let inserted = api
        .insert(row(json!({
            "name": "Cara", "email": null, "phone": null,
            "languages": ["german"], "age": 27, "user_id": null
        })))
        .await
        .unwrap();
    assert_eq!(inserted.id(), Some(&json!(3)));

    session
        .with_table_mut(TableName::Students, |t| t.apply_insert(inserted.clone()))
        .unwrap()
        .unwrap();

    let names = session
        .with_table(TableName::Students, |t| {
            t.data
                .iter()
                .map(|r| r.get("name").cloned().unwrap())
                .collect::<Vec<_>>()
        })
        .unwrap();
    assert_eq!(names, vec![json!("Alice"), json!("Bob"), json!("Cara")]);
}

#[tokio::test]
async fn test_update_then_optimistic_patch() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session.fetch_tables(&[TableName::Students]).await.unwrap();

    let api = session
        .with_table(TableName::Students, |t| t.api.clone())
        .unwrap();
    let updated = api
        .update_by_id(&json!(2), row(json!({"age": 32})))
        .await
        .unwrap();

    session
        .with_table_mut(TableName::Students, |t| {
            t.apply_update(&json!(2), updated.clone())
        })
        .unwrap()
        .unwrap();

    let age = session
        .with_table(TableName::Students, |t| {
            t.get_cached(&json!(2)).unwrap().get("age").cloned()
        })
        .unwrap();
    assert_eq!(age, Some(json!(32)));
}

#[tokio::test]
async fn test_delete_then_optimistic_patch() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session.fetch_tables(&[TableName::Bookings]).await.unwrap();

    let api = session
        .with_table(TableName::Bookings, |t| t.api.clone())
        .unwrap();
    api.delete_by_id(&json!(101)).await.unwrap();

    session
        .with_table_mut(TableName::Bookings, |t| t.apply_delete(&json!(101)))
        .unwrap()
        .unwrap();

    let remaining = session
        .with_table(TableName::Bookings, |t| t.data.len())
        .unwrap();
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn test_failed_mutation_leaves_cache_untouched() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());
    session.fetch_tables(&[TableName::Bookings]).await.unwrap();

    let api = session
        .with_table(TableName::Bookings, |t| t.api.clone())
        .unwrap();

    // The store rejects the delete; the caller never patches.
    let err = api.delete_by_id(&json!(999)).await.unwrap_err();
    assert!(err.to_string().contains("999"));

    let remaining = session
        .with_table(TableName::Bookings, |t| t.data.len())
        .unwrap();
    assert_eq!(remaining, 3);
}

#[tokio::test]
async fn test_mutations_do_not_refresh_snapshot_implicitly() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());
    session.fetch_tables(&[TableName::Students]).await.unwrap();

    let api = session
        .with_table(TableName::Students, |t| t.api.clone())
        .unwrap();
    api.insert(row(json!({"name": "Dana", "languages": [], "age": 40})))
        .await
        .unwrap();

    // The write succeeded remotely, but nothing re-fetched and nothing
    // patched, so the snapshot still has the original two rows.
    let cached = session
        .with_table(TableName::Students, |t| t.data.len())
        .unwrap();
    assert_eq!(cached, 2);
    assert_eq!(store.select_all_calls(), 1);
}
