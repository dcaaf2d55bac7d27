//! Field definitions within a table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation kind of a field.
///
/// Every field is classified with one of these kinds; the presentation
/// adapter dispatches on them with a total match, so adding a kind is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain numeric value
    Number,
    /// Free text
    Text,
    /// Boolean flag, rendered Yes/No
    Boolean,
    /// Timestamp or calendar date
    Date,
    /// List-valued field (languages, equipment ids)
    Array,
    /// Monetary amount
    Price,
    /// Duration in minutes
    Duration,
    /// Enumerated status with a label/style lookup
    Status,
}

impl FieldKind {
    /// Returns `true` for kinds backed by a numeric value.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::Number | FieldKind::Price | FieldKind::Duration
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Number => "number",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Array => "array",
            FieldKind::Price => "price",
            FieldKind::Duration => "duration",
            FieldKind::Status => "status",
        };
        f.write_str(name)
    }
}

/// Field definition within a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name (snake_case, matching the remote column)
    pub name: String,
    /// Presentation kind
    pub kind: FieldKind,
    /// Whether the remote column is NOT NULL
    pub required: bool,
    /// Whether this field is the primary key
    pub primary_key: bool,
}

impl FieldDef {
    /// A required primary-key field.
    pub fn key(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            primary_key: true,
        }
    }

    /// A required non-key field.
    pub fn required(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            primary_key: false,
        }
    }

    /// An optional non-key field.
    pub fn optional(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            primary_key: false,
        }
    }
}
