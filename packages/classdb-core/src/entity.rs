//! Table entities and their CRUD binding.
//!
//! A [`TableEntity`] is the in-memory representation of one remote table:
//! field metadata, the cached row snapshot, and a [`TableApi`] capability
//! bundle whose five operations are bound to the table's name. The snapshot
//! has no versioning; concurrent external edits stay invisible until a
//! refresh.

use std::sync::Arc;

use serde_json::Value;

use classdb_types::row::{display_string, loosely_equal};
use classdb_types::{FieldDef, FilterOption, Row, SortOption, TableName};

use crate::error::DataError;
use crate::store::{StoreError, TableStore};

/// The five table operations, bound to one table name.
///
/// Each call goes straight to the backing store and is independently
/// fallible. Mutations do not touch the cached snapshot; callers patch it
/// through the explicit `apply_*` functions on [`TableEntity`] after a
/// success.
#[derive(Debug)]
pub struct TableApi<S> {
    table: TableName,
    store: Arc<S>,
}

impl<S> Clone for TableApi<S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TableStore> TableApi<S> {
    pub fn new(table: TableName, store: Arc<S>) -> Self {
        Self { table, store }
    }

    pub fn table(&self) -> TableName {
        self.table
    }

    pub async fn get(&self) -> Result<Vec<Row>, StoreError> {
        self.store.select_all(self.table).await
    }

    pub async fn get_by_id(&self, id: &Value) -> Result<Option<Row>, StoreError> {
        self.store.select_by_id(self.table, id).await
    }

    pub async fn insert(&self, row: Row) -> Result<Row, StoreError> {
        self.store.insert(self.table, row).await
    }

    pub async fn update_by_id(&self, id: &Value, patch: Row) -> Result<Row, StoreError> {
        self.store.update_by_id(self.table, id, patch).await
    }

    pub async fn delete_by_id(&self, id: &Value) -> Result<(), StoreError> {
        self.store.delete_by_id(self.table, id).await
    }
}

/// One remote table as loaded into the session.
#[derive(Debug)]
pub struct TableEntity<S> {
    pub name: TableName,
    /// Field metadata (registry entry, or inferred from the first row)
    pub fields: Vec<FieldDef>,
    /// Cached row snapshot, in the order the remote query returned them
    pub data: Vec<Row>,
    /// Set when the load degraded (fetch failure); the entity still renders
    pub error: Option<String>,
    pub filter_options: Vec<FilterOption>,
    pub sort_options: Vec<SortOption>,
    pub relationships: Vec<TableName>,
    pub description: String,
    pub api: TableApi<S>,
}

impl<S> Clone for TableEntity<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            fields: self.fields.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
            filter_options: self.filter_options.clone(),
            sort_options: self.sort_options.clone(),
            relationships: self.relationships.clone(),
            description: self.description.clone(),
            api: self.api.clone(),
        }
    }
}

impl<S> TableEntity<S> {
    /// Name of the primary key field (`id` unless metadata says otherwise).
    pub fn primary_key_field(&self) -> &str {
        self.fields
            .iter()
            .find(|f| f.primary_key)
            .map(|f| f.name.as_str())
            .unwrap_or("id")
    }

    /// Looks a row up in the cached snapshot by primary key.
    ///
    /// Ids compare loosely, so `1` finds a row whose id is `"1"`.
    pub fn get_cached(&self, id: &Value) -> Option<&Row> {
        let key = self.primary_key_field();
        self.data
            .iter()
            .find(|row| row.get(key).is_some_and(|v| loosely_equal(v, id)))
    }

    /// Appends a freshly inserted row to the snapshot.
    ///
    /// Rejects a duplicate primary key and leaves the snapshot unchanged in
    /// that case.
    pub fn apply_insert(&mut self, row: Row) -> Result<(), DataError> {
        let key = self.primary_key_field().to_string();
        if let Some(id) = row.get(&key) {
            if !id.is_null() && self.get_cached(id).is_some() {
                return Err(DataError::DuplicateId {
                    table: self.name,
                    id: display_string(id),
                });
            }
        }
        self.data.push(row);
        Ok(())
    }

    /// Merges an updated row over the cached copy with the same id.
    pub fn apply_update(&mut self, id: &Value, updated: Row) -> Result<(), DataError> {
        let key = self.primary_key_field().to_string();
        let row = self
            .data
            .iter_mut()
            .find(|row| row.get(&key).is_some_and(|v| loosely_equal(v, id)))
            .ok_or_else(|| DataError::RecordNotFound {
                table: self.name,
                id: display_string(id),
            })?;
        for (field, value) in updated.0 {
            row.0.insert(field, value);
        }
        Ok(())
    }

    /// Removes the cached row with the given id.
    pub fn apply_delete(&mut self, id: &Value) -> Result<(), DataError> {
        let key = self.primary_key_field().to_string();
        let before = self.data.len();
        self.data
            .retain(|row| !row.get(&key).is_some_and(|v| loosely_equal(v, id)));
        if self.data.len() == before {
            return Err(DataError::RecordNotFound {
                table: self.name,
                id: display_string(id),
            });
        }
        Ok(())
    }
}
