//! Shared fixtures for the integration tests.

use std::sync::Arc;

use serde_json::{json, Value};

use classdb_core::store::{MemoryStore, StoreError, TableStore};
use classdb_types::{Row, TableName};

pub fn row(value: Value) -> Row {
    Row::from_value(value).expect("fixture rows are objects")
}

/// A store seeded with a small school: two students, one teacher, two
/// packages, and three bookings.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();

    store.seed(
        TableName::Students,
        vec![
            row(json!({
                "id": 1, "name": "Alice", "email": "alice@example.com",
                "phone": null, "languages": ["english", "french"], "age": 22,
                "user_id": null
            })),
            row(json!({
                "id": 2, "name": "Bob", "email": null, "phone": null,
                "languages": ["spanish"], "age": 31, "user_id": null
            })),
        ],
    );

    store.seed(
        TableName::Teachers,
        vec![row(json!({
            "id": 1, "name": "Fernando", "email": null, "phone": null,
            "languages": ["english", "spanish"], "user_id": null
        }))],
    );

    store.seed(
        TableName::Packages,
        vec![
            row(json!({
                "id": 10, "price": 120, "hours": 2, "capacity": 3,
                "description": "Beginner group", "created_at": null
            })),
            row(json!({
                "id": 11, "price": 200, "hours": 4, "capacity": 1,
                "description": null, "created_at": null
            })),
        ],
    );

    store.seed(
        TableName::Bookings,
        vec![
            row(json!({
                "id": 100, "package_id": 10, "student_id": 1,
                "start_date": "2025-06-01T09:00:00Z", "created_at": null
            })),
            row(json!({
                "id": 101, "package_id": 11, "student_id": 2,
                "start_date": "2025-06-02T09:00:00Z", "created_at": null
            })),
            row(json!({
                "id": 102, "package_id": 10, "student_id": 1,
                "start_date": "2025-06-03T09:00:00Z", "created_at": null
            })),
        ],
    );

    Arc::new(store)
}

/// A store whose every operation fails with a backend error.
#[derive(Debug, Default)]
pub struct FailingStore;

impl TableStore for FailingStore {
    async fn select_all(&self, _table: TableName) -> Result<Vec<Row>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn select_by_id(
        &self,
        _table: TableName,
        _id: &Value,
    ) -> Result<Option<Row>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn insert(&self, _table: TableName, _row: Row) -> Result<Row, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn update_by_id(
        &self,
        _table: TableName,
        _id: &Value,
        _patch: Row,
    ) -> Result<Row, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn delete_by_id(&self, _table: TableName, _id: &Value) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}
