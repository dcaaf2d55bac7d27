//! Loader and session cache behavior.

use std::sync::Arc;

use serde_json::json;

use classdb_core::{load_table, DataError, SessionTables, TableRegistry};
use classdb_types::TableName;

use super::common::{row, seeded_store, FailingStore};

#[tokio::test]
async fn test_load_table_attaches_registry_metadata() {
    let store = seeded_store();
    let entity = load_table(&store, &TableRegistry::builtin(), TableName::Students).await;

    assert_eq!(entity.name, TableName::Students);
    assert_eq!(entity.data.len(), 2);
    assert!(entity.error.is_none());
    assert_eq!(entity.primary_key_field(), "id");
    assert!(entity.fields.iter().any(|f| f.name == "languages"));
    assert!(!entity.filter_options.is_empty());
    assert!(entity.relationships.contains(&TableName::Bookings));
}

#[tokio::test]
async fn test_fetch_failure_degrades_to_empty_entity() {
    let store = Arc::new(FailingStore);
    let entity = load_table(&store, &TableRegistry::builtin(), TableName::Students).await;

    assert!(entity.data.is_empty());
    let message = entity.error.expect("degraded load must carry an error");
    assert!(message.contains("connection refused"));
    // Registry metadata still applies, so the page can render headers.
    assert!(!entity.fields.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_without_registry_synthesizes_id_field() {
    let store = Arc::new(FailingStore);
    let entity = load_table(&store, &TableRegistry::empty(), TableName::Students).await;

    assert_eq!(entity.fields.len(), 1);
    assert_eq!(entity.fields[0].name, "id");
    assert!(entity.fields[0].primary_key);
}

#[tokio::test]
async fn test_unregistered_table_infers_fields_from_first_row() {
    let store = seeded_store();
    let entity = load_table(&store, &TableRegistry::empty(), TableName::Students).await;

    let age = entity.fields.iter().find(|f| f.name == "age").unwrap();
    assert!(!age.required && !age.primary_key);
    let id = entity.fields.iter().find(|f| f.name == "id").unwrap();
    assert!(id.required && id.primary_key);
}

#[tokio::test]
async fn test_batch_load_is_deduplicated() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());

    let batch = [TableName::Students, TableName::Teachers];
    session.fetch_tables(&batch).await.unwrap();
    assert_eq!(store.select_all_calls(), 2);

    // The second identical batch is fully served from the cache.
    session.fetch_tables(&batch).await.unwrap();
    assert_eq!(store.select_all_calls(), 2);
}

#[tokio::test]
async fn test_batch_load_fetches_only_the_unresolved_subset() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());

    session.fetch_tables(&[TableName::Students]).await.unwrap();
    session
        .fetch_tables(&[TableName::Students, TableName::Teachers, TableName::Teachers])
        .await
        .unwrap();

    // One fetch for students, one for teachers; the duplicate name inside
    // the batch does not fetch twice either.
    assert_eq!(store.select_all_calls(), 2);
    assert!(session.is_loaded(TableName::Students).unwrap());
    assert!(session.is_loaded(TableName::Teachers).unwrap());
}

#[tokio::test]
async fn test_fetch_named_rejects_unknown_names_before_any_fetch() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());

    let err = session
        .fetch_named(&["students", "grades"])
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::UnknownTable(_)));

    // Fail-closed: validation happens before any network call.
    assert_eq!(store.select_all_calls(), 0);
    assert!(!session.is_loaded(TableName::Students).unwrap());
}

#[tokio::test]
async fn test_refresh_refetches_and_sees_new_rows() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());

    session.fetch_tables(&[TableName::Teachers]).await.unwrap();
    let count = session
        .with_table(TableName::Teachers, |t| t.data.len())
        .unwrap();
    assert_eq!(count, 1);

    // Another session writes; the cache stays stale until refresh.
    store.seed(
        TableName::Teachers,
        vec![
            row(json!({"id": 1, "name": "Fernando"})),
            row(json!({"id": 2, "name": "Marta"})),
        ],
    );
    let stale = session
        .with_table(TableName::Teachers, |t| t.data.len())
        .unwrap();
    assert_eq!(stale, 1);

    session.refresh(TableName::Teachers).await.unwrap();
    let fresh = session
        .with_table(TableName::Teachers, |t| t.data.len())
        .unwrap();
    assert_eq!(fresh, 2);
    assert_eq!(store.select_all_calls(), 2);
}

#[tokio::test]
async fn test_with_table_on_unloaded_table_errors() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());

    let err = session
        .with_table(TableName::Packages, |t| t.data.len())
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::TableNotLoaded {
            table: TableName::Packages
        }
    ));
}
