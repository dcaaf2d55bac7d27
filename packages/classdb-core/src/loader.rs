//! Table loading and the per-session cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use classdb_types::{FieldDef, FieldKind, Row, TableName};

use crate::entity::{TableApi, TableEntity};
use crate::error::DataError;
use crate::registry::TableRegistry;
use crate::store::TableStore;

/// Loads one table into a [`TableEntity`].
///
/// This never fails: a fetch failure produces an entity with an empty
/// snapshot and a populated `error`, so the page renders an error state
/// instead of crashing. Field metadata comes from the registry when an entry
/// exists and is inferred from the first returned row otherwise.
pub async fn load_table<S: TableStore>(
    store: &Arc<S>,
    registry: &TableRegistry,
    name: TableName,
) -> TableEntity<S> {
    debug!(table = %name, "loading table");

    let (data, error) = match store.select_all(name).await {
        Ok(rows) => (rows, None),
        Err(err) => {
            warn!(table = %name, error = %err, "table load degraded to empty");
            (Vec::new(), Some(err.to_string()))
        }
    };

    let meta = registry.get(name);
    let fields = match meta {
        Some(meta) => meta.fields.clone(),
        None => infer_fields(&data),
    };

    TableEntity {
        name,
        fields,
        data,
        error,
        filter_options: meta.map(|m| m.filter_options.clone()).unwrap_or_default(),
        sort_options: meta.map(|m| m.sort_options.clone()).unwrap_or_default(),
        relationships: meta.map(|m| m.relationships.clone()).unwrap_or_default(),
        description: meta.map(|m| m.description.clone()).unwrap_or_default(),
        api: TableApi::new(name, Arc::clone(store)),
    }
}

/// Derives a field list from the keys of the first row.
///
/// Every field is optional and non-key except one literally named `id`,
/// which becomes the required primary key. An empty row set yields a single
/// synthetic `id` field.
fn infer_fields(rows: &[Row]) -> Vec<FieldDef> {
    let Some(first) = rows.first() else {
        return vec![FieldDef::key("id", FieldKind::Number)];
    };

    first
        .field_names()
        .map(|name| {
            if name == "id" {
                return FieldDef::key("id", kind_of(first.get(name)));
            }
            FieldDef::optional(name, kind_of(first.get(name)))
        })
        .collect()
}

fn kind_of(value: Option<&Value>) -> FieldKind {
    match value {
        Some(Value::Number(_)) => FieldKind::Number,
        Some(Value::Bool(_)) => FieldKind::Boolean,
        Some(Value::Array(_)) => FieldKind::Array,
        _ => FieldKind::Text,
    }
}

/// Per-session table cache.
///
/// Entities live here for the lifetime of the session; nothing tears them
/// down short of dropping the whole cache. Batch loads are deduplicated
/// against the loaded set, so a loaded table is never re-fetched except
/// through an explicit [`SessionTables::refresh`].
#[derive(Debug)]
pub struct SessionTables<S> {
    store: Arc<S>,
    registry: TableRegistry,
    tables: RwLock<HashMap<TableName, TableEntity<S>>>,
}

impl<S: TableStore> SessionTables<S> {
    pub fn new(store: Arc<S>, registry: TableRegistry) -> Self {
        Self {
            store,
            registry,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_loaded(&self, name: TableName) -> Result<bool, DataError> {
        let tables = self.tables.read().map_err(|_| DataError::LockPoisoned)?;
        Ok(tables.contains_key(&name))
    }

    pub fn loaded_tables(&self) -> Result<Vec<TableName>, DataError> {
        let tables = self.tables.read().map_err(|_| DataError::LockPoisoned)?;
        Ok(tables.keys().copied().collect())
    }

    /// Loads the subset of `names` that is not already cached.
    ///
    /// The dedup check and the final insert are separate lock scopes, so two
    /// overlapping batch calls can in principle both fetch the same table;
    /// the second insert wins. That window is accepted for the single
    /// event-loop consumer this cache serves.
    pub async fn fetch_tables(&self, names: &[TableName]) -> Result<(), DataError> {
        let missing: Vec<TableName> = {
            let tables = self.tables.read().map_err(|_| DataError::LockPoisoned)?;
            let mut seen = Vec::new();
            names
                .iter()
                .copied()
                .filter(|name| {
                    if tables.contains_key(name) || seen.contains(name) {
                        return false;
                    }
                    seen.push(*name);
                    true
                })
                .collect()
        };

        if missing.is_empty() {
            debug!("batch load fully served from cache");
            return Ok(());
        }

        for name in missing {
            let entity = load_table(&self.store, &self.registry, name).await;
            let mut tables = self.tables.write().map_err(|_| DataError::LockPoisoned)?;
            tables.insert(name, entity);
        }

        Ok(())
    }

    /// String-keyed batch load. Every name is validated against the
    /// allow-list before any fetch is attempted (fail-closed).
    pub async fn fetch_named(&self, names: &[&str]) -> Result<(), DataError> {
        let parsed = names
            .iter()
            .map(|name| name.parse::<TableName>())
            .collect::<Result<Vec<_>, _>>()?;
        self.fetch_tables(&parsed).await
    }

    /// Re-fetches a table unconditionally, replacing the cached entity.
    pub async fn refresh(&self, name: TableName) -> Result<(), DataError> {
        let entity = load_table(&self.store, &self.registry, name).await;
        let mut tables = self.tables.write().map_err(|_| DataError::LockPoisoned)?;
        tables.insert(name, entity);
        Ok(())
    }

    /// Runs a closure against the full table map (relation resolution needs
    /// several tables at once).
    pub fn with_tables<F, R>(&self, f: F) -> Result<R, DataError>
    where
        F: FnOnce(&HashMap<TableName, TableEntity<S>>) -> R,
    {
        let tables = self.tables.read().map_err(|_| DataError::LockPoisoned)?;
        Ok(f(&tables))
    }

    /// Runs a closure against one loaded table.
    pub fn with_table<F, R>(&self, name: TableName, f: F) -> Result<R, DataError>
    where
        F: FnOnce(&TableEntity<S>) -> R,
    {
        let tables = self.tables.read().map_err(|_| DataError::LockPoisoned)?;
        let entity = tables
            .get(&name)
            .ok_or(DataError::TableNotLoaded { table: name })?;
        Ok(f(entity))
    }

    /// Runs a closure against one loaded table mutably (optimistic cache
    /// patching after a successful write).
    pub fn with_table_mut<F, R>(&self, name: TableName, f: F) -> Result<R, DataError>
    where
        F: FnOnce(&mut TableEntity<S>) -> R,
    {
        let mut tables = self.tables.write().map_err(|_| DataError::LockPoisoned)?;
        let entity = tables
            .get_mut(&name)
            .ok_or(DataError::TableNotLoaded { table: name })?;
        Ok(f(entity))
    }
}
