//! Declarative filter and sort option catalogs.
//!
//! These describe what the UI offers for a table; they are configuration,
//! not derived from data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selectable filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterChoice {
    pub value: Value,
    pub label: String,
}

impl FilterChoice {
    pub fn new(value: impl Into<Value>, label: &str) -> Self {
        Self {
            value: value.into(),
            label: label.to_string(),
        }
    }
}

/// A filterable field and its candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub field: String,
    pub label: String,
    /// Whether several choices may be active at once (union semantics)
    pub multi_select: bool,
    pub choices: Vec<FilterChoice>,
}

impl FilterOption {
    pub fn new(field: &str, label: &str, choices: Vec<FilterChoice>) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            multi_select: false,
            choices,
        }
    }

    pub fn multi(field: &str, label: &str, choices: Vec<FilterChoice>) -> Self {
        Self {
            multi_select: true,
            ..Self::new(field, label, choices)
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One offered ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: String,
    pub label: String,
    pub direction: SortDirection,
}

impl SortOption {
    pub fn new(field: &str, label: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            direction,
        }
    }
}
