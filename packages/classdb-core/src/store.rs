//! Backing store boundary.
//!
//! The remote database is reached only through the [`TableStore`] capability
//! trait. The concrete protocol (REST/RPC to a hosted Postgres service) lives
//! behind an adapter outside this crate; [`MemoryStore`] is the in-memory
//! reference implementation the tests run against.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde_json::{json, Value};
use thiserror::Error;

use classdb_types::row::{as_number, loosely_equal};
use classdb_types::{Row, TableName};

/// Backing store failures.
///
/// This is the store's own taxonomy; the loader never adds cases (no
/// timeouts, no retries) on top of it.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Remote/backend failure (network, rejected statement, ...)
    #[error("backend error: {0}")]
    Backend(String),

    /// Point operation targeted a row that does not exist
    #[error("row {id} not found in table '{table}'")]
    RowNotFound { table: TableName, id: String },

    /// Row could not be encoded/decoded at the boundary
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Capability object for one backing store.
///
/// Each operation is independently fallible and async; a mutation that fails
/// leaves all client-side state untouched.
#[allow(async_fn_in_trait)]
pub trait TableStore: Send + Sync {
    /// Fetches every row of a table.
    async fn select_all(&self, table: TableName) -> Result<Vec<Row>, StoreError>;

    /// Fetches a single row by primary key; `None` when absent.
    async fn select_by_id(&self, table: TableName, id: &Value)
        -> Result<Option<Row>, StoreError>;

    /// Inserts a row and returns it as stored (with any assigned id).
    async fn insert(&self, table: TableName, row: Row) -> Result<Row, StoreError>;

    /// Applies a partial update and returns the full updated row.
    async fn update_by_id(
        &self,
        table: TableName,
        id: &Value,
        patch: Row,
    ) -> Result<Row, StoreError>;

    /// Deletes a row by primary key.
    async fn delete_by_id(&self, table: TableName, id: &Value) -> Result<(), StoreError>;
}

/// In-memory store.
///
/// Seedable, id-assigning, and it counts `select_all` calls so tests can
/// observe whether the session cache really deduplicated a batch load.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<TableName, Vec<Row>>>,
    select_all_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of a table.
    pub fn seed(&self, table: TableName, rows: Vec<Row>) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.insert(table, rows);
    }

    /// Number of `select_all` calls served so far.
    pub fn select_all_calls(&self) -> u64 {
        self.select_all_calls.load(Ordering::Acquire)
    }

    fn next_id(rows: &[Row]) -> i64 {
        rows.iter()
            .filter_map(|row| row.id().and_then(as_number))
            .fold(0, |max, id| max.max(id as i64))
            + 1
    }
}

impl TableStore for MemoryStore {
    async fn select_all(&self, table: TableName) -> Result<Vec<Row>, StoreError> {
        self.select_all_calls.fetch_add(1, Ordering::AcqRel);
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(tables.get(&table).cloned().unwrap_or_default())
    }

    async fn select_by_id(
        &self,
        table: TableName,
        id: &Value,
    ) -> Result<Option<Row>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let row = tables.get(&table).and_then(|rows| {
            rows.iter()
                .find(|row| row.id().is_some_and(|v| loosely_equal(v, id)))
                .cloned()
        });
        Ok(row)
    }

    async fn insert(&self, table: TableName, mut row: Row) -> Result<Row, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let rows = tables.entry(table).or_default();
        if row.id().is_none_or(Value::is_null) {
            row.set("id", json!(Self::next_id(rows)));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_by_id(
        &self,
        table: TableName,
        id: &Value,
        patch: Row,
    ) -> Result<Row, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let rows = tables.entry(table).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row.id().is_some_and(|v| loosely_equal(v, id)))
            .ok_or_else(|| StoreError::RowNotFound {
                table,
                id: classdb_types::row::display_string(id),
            })?;
        for (field, value) in patch.0 {
            row.0.insert(field, value);
        }
        Ok(row.clone())
    }

    async fn delete_by_id(&self, table: TableName, id: &Value) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let rows = tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|row| !row.id().is_some_and(|v| loosely_equal(v, id)));
        if rows.len() == before {
            return Err(StoreError::RowNotFound {
                table,
                id: classdb_types::row::display_string(id),
            });
        }
        Ok(())
    }
}
