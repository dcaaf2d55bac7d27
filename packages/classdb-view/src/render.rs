//! Presentation adapter.
//!
//! Maps field kinds to formatted cells. The dispatch over [`FieldKind`] is a
//! total match; adding a kind will not compile until every renderer handles
//! it.

use std::collections::HashMap;

use serde_json::Value;

use classdb_types::row::display_string;
use classdb_types::{FieldDef, FieldKind, Row};

use crate::format::{
    format_currency, format_date, format_duration, format_status, StatusMap, DEFAULT_PLACEHOLDER,
};

/// Presentation settings, passed explicitly to the renderer.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Currency symbol for price fields
    pub currency_symbol: String,
    /// Marker for null/undefined cells
    pub missing_marker: String,
    /// Verbose ("2 hours 30 minutes") vs compact ("2h 30m") durations
    pub verbose_durations: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            missing_marker: "N/A".to_string(),
            verbose_durations: true,
        }
    }
}

/// One rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Style class for status cells
    pub class_name: Option<String>,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self {
            text,
            class_name: None,
        }
    }
}

/// Renders one cell.
///
/// A relation-resolved string wins over the raw value; a null or missing
/// value renders as the configured marker; everything else dispatches on the
/// field kind.
pub fn render_cell(
    field: &FieldDef,
    value: Option<&Value>,
    resolved: Option<&str>,
    status_map: StatusMap,
    config: &DisplayConfig,
) -> Cell {
    if let Some(text) = resolved {
        return Cell::plain(text.to_string());
    }

    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Cell::plain(config.missing_marker.clone());
    };

    match field.kind {
        FieldKind::Number | FieldKind::Text => Cell::plain(display_string(value)),
        FieldKind::Boolean => {
            let text = match display_string(value).as_str() {
                "true" => "Yes".to_string(),
                "false" => "No".to_string(),
                other => other.to_string(),
            };
            Cell::plain(text)
        }
        FieldKind::Date => Cell::plain(format_date(Some(value), DEFAULT_PLACEHOLDER)),
        FieldKind::Array => {
            let text = display_string(value);
            if text.is_empty() {
                Cell::plain(config.missing_marker.clone())
            } else {
                Cell::plain(text)
            }
        }
        FieldKind::Price => Cell::plain(format_currency(
            Some(value),
            &config.currency_symbol,
            DEFAULT_PLACEHOLDER,
        )),
        FieldKind::Duration => Cell::plain(format_duration(
            Some(value),
            config.verbose_durations,
            DEFAULT_PLACEHOLDER,
        )),
        FieldKind::Status => {
            let style = format_status(Some(value), status_map);
            Cell {
                text: style.label.to_string(),
                class_name: Some(style.class_name.to_string()),
            }
        }
    }
}

/// Renders one row: one cell per field, with relation-resolved strings
/// substituted where a mapping produced one.
pub fn render_row(
    fields: &[FieldDef],
    row: &Row,
    resolved: &HashMap<String, String>,
    status_map: StatusMap,
    config: &DisplayConfig,
) -> Vec<Cell> {
    fields
        .iter()
        .map(|field| {
            render_cell(
                field,
                row.get(&field.name),
                resolved.get(&field.name).map(String::as_str),
                status_map,
                config,
            )
        })
        .collect()
}

/// Renders a filtered row set. `resolved_per_row` is indexed like `rows`;
/// rows past its end render without relation substitution (async resolution
/// that has not arrived yet).
pub fn render_rows(
    fields: &[FieldDef],
    rows: &[Row],
    resolved_per_row: &[HashMap<String, String>],
    status_map: StatusMap,
    config: &DisplayConfig,
) -> Vec<Vec<Cell>> {
    let empty = HashMap::new();
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let resolved = resolved_per_row.get(index).unwrap_or(&empty);
            render_row(fields, row, resolved, status_map, config)
        })
        .collect()
}
