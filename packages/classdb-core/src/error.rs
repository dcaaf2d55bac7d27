//! Data layer error types.

use thiserror::Error;

use classdb_types::{TableName, UnknownTableError};

use crate::store::StoreError;

/// Errors surfaced by the loader, session cache, and cache patching.
///
/// Nothing here is fatal: validation rejections happen before any I/O, store
/// failures are recoverable, and a failed table load degrades to an empty,
/// error-flagged entity instead of propagating.
#[derive(Error, Debug, Clone)]
pub enum DataError {
    /// Table name outside the allow-list (rejected before any network call)
    #[error(transparent)]
    UnknownTable(#[from] UnknownTableError),

    /// Table has not been loaded into the session cache
    #[error("table '{table}' is not loaded")]
    TableNotLoaded { table: TableName },

    /// Optimistic insert would duplicate a primary key
    #[error("duplicate id {id} in table '{table}'")]
    DuplicateId { table: TableName, id: String },

    /// Optimistic update/delete targeted a row absent from the cache
    #[error("record {id} not found in table '{table}'")]
    RecordNotFound { table: TableName, id: String },

    /// Backing store failure (the store's own taxonomy, never synthesized)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session cache lock poisoned
    #[error("lock poisoned")]
    LockPoisoned,
}
