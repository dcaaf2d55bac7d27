//! Relation resolution.
//!
//! Turns foreign-key-shaped field values into human-readable display
//! strings, either from the cached snapshot of the target table or through a
//! live point query. Resolution never fails; a miss degrades to a fallback
//! string.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use classdb_types::row::{display_string, loosely_equal};
use classdb_types::{Row, TableName};

use crate::entity::{TableApi, TableEntity};
use crate::store::TableStore;

/// Resolves a foreign key against the cached snapshot of the target table.
///
/// Ids compare loosely (`1` matches `"1"`). Returns `fallback` when the
/// value is missing/null, the target table is absent, no row matches, or the
/// display field is empty.
pub fn resolve_relation<S>(
    value: Option<&Value>,
    target: Option<&TableEntity<S>>,
    display_field: &str,
    id_field: &str,
    fallback: &str,
) -> String {
    let (Some(value), Some(target)) = (value, target) else {
        return fallback.to_string();
    };
    if value.is_null() {
        return fallback.to_string();
    }

    let display = target
        .data
        .iter()
        .find(|row| row.get(id_field).is_some_and(|v| loosely_equal(v, value)))
        .and_then(|row| row.get(display_field))
        .map(display_string)
        .unwrap_or_default();

    if display.is_empty() {
        fallback.to_string()
    } else {
        display
    }
}

/// Resolves a foreign key through a live point query instead of the cache.
///
/// Used when freshness matters more than the round trip. Same fallback
/// discipline as the synchronous form; a store failure also degrades to the
/// fallback.
pub async fn resolve_relation_via_api<S: TableStore>(
    value: Option<&Value>,
    api: &TableApi<S>,
    display_field: &str,
    fallback: &str,
) -> String {
    let Some(value) = value else {
        return fallback.to_string();
    };
    if value.is_null() {
        return fallback.to_string();
    }

    let display = match api.get_by_id(value).await {
        Ok(Some(row)) => row.get(display_field).map(display_string).unwrap_or_default(),
        Ok(None) => String::new(),
        Err(err) => {
            debug!(table = %api.table(), error = %err, "relation point query failed");
            String::new()
        }
    };

    if display.is_empty() {
        fallback.to_string()
    } else {
        display
    }
}

/// Named display formatters for relation fields.
///
/// An explicit enumeration rather than open callbacks: every formatter a
/// mapping can name is matched totally below, so a new one is a
/// compile-time-checked addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Student name ("Alice")
    StudentName,
    /// Student name with email ("Alice (alice@example.com)")
    StudentDetail,
    /// Teacher name
    TeacherName,
    /// Package hours and capacity ("2hrs, 3 ppl")
    PackageSummary,
    /// Package hours, capacity, price, and description
    PackageDetail,
    /// Booking as package capacity/hours plus student name
    BookingSummary,
}

impl Formatter {
    pub fn apply<S>(
        self,
        value: Option<&Value>,
        tables: &HashMap<TableName, TableEntity<S>>,
    ) -> String {
        match self {
            Formatter::StudentName => resolve_relation(
                value,
                tables.get(&TableName::Students),
                "name",
                "id",
                "Unknown student",
            ),
            Formatter::StudentDetail => {
                let Some(student) = find_row(tables, TableName::Students, value) else {
                    return "Unknown student".to_string();
                };
                let name = field_string(student, "name");
                match (name, field_string(student, "email")) {
                    (Some(name), Some(email)) => format!("{name} ({email})"),
                    (Some(name), None) => name,
                    _ => "Unknown student".to_string(),
                }
            }
            Formatter::TeacherName => resolve_relation(
                value,
                tables.get(&TableName::Teachers),
                "name",
                "id",
                "Unknown teacher",
            ),
            Formatter::PackageSummary => {
                match find_row(tables, TableName::Packages, value) {
                    Some(package) => package_summary(package),
                    None => "Unknown package".to_string(),
                }
            }
            Formatter::PackageDetail => {
                let Some(package) = find_row(tables, TableName::Packages, value) else {
                    return "Unknown package".to_string();
                };
                let hours = field_string(package, "hours").unwrap_or_else(|| "?".to_string());
                let capacity = field_string(package, "capacity").unwrap_or_else(|| "?".to_string());
                let price = field_string(package, "price").unwrap_or_else(|| "?".to_string());
                let base = format!("{hours}hrs, {capacity} ppl - ${price}");
                match field_string(package, "description") {
                    Some(description) => format!("{base} ({description})"),
                    None => base,
                }
            }
            Formatter::BookingSummary => booking_summary(value, tables),
        }
    }
}

/// Package half of a booking summary: "2hrs, 3 ppl".
fn package_summary(package: &Row) -> String {
    let hours = field_string(package, "hours").unwrap_or_else(|| "?".to_string());
    let capacity = field_string(package, "capacity").unwrap_or_else(|| "?".to_string());
    format!("{hours}hrs, {capacity} ppl")
}

/// Composite booking display: "<capacity> ppl, <hours>hrs - <student>".
///
/// Either half may be missing; whatever is available is shown, and with
/// neither the fallback is "Booking #<id>".
fn booking_summary<S>(value: Option<&Value>, tables: &HashMap<TableName, TableEntity<S>>) -> String {
    let Some(value) = value else {
        return "Unknown booking".to_string();
    };
    if value.is_null() {
        return "Unknown booking".to_string();
    }

    let numbered = format!("Booking #{}", display_string(value));
    let Some(booking) = find_row(tables, TableName::Bookings, Some(value)) else {
        return numbered;
    };

    let package_part = find_row(tables, TableName::Packages, booking.get("package_id"))
        .map(|package| {
            let capacity = field_string(package, "capacity").unwrap_or_else(|| "?".to_string());
            let hours = field_string(package, "hours").unwrap_or_else(|| "?".to_string());
            format!("{capacity} ppl, {hours}hrs")
        });

    let student_part = find_row(tables, TableName::Students, booking.get("student_id"))
        .and_then(|student| field_string(student, "name"));

    match (package_part, student_part) {
        (Some(package), Some(student)) => format!("{package} - {student}"),
        (Some(package), None) => package,
        (None, Some(student)) => student,
        (None, None) => numbered,
    }
}

fn find_row<'a, S>(
    tables: &'a HashMap<TableName, TableEntity<S>>,
    table: TableName,
    id: Option<&Value>,
) -> Option<&'a Row> {
    let id = id?;
    if id.is_null() {
        return None;
    }
    let entity = tables.get(&table)?;
    entity
        .data
        .iter()
        .find(|row| row.id().is_some_and(|v| loosely_equal(v, id)))
}

/// Non-empty display string of a field.
fn field_string(row: &Row, field: &str) -> Option<String> {
    let text = row.get(field).map(display_string)?;
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Display rule for one foreign-key-shaped field.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    /// Field in the source row (e.g. `student_id`)
    pub source_field: String,
    /// Table the relation points at
    pub target_table: TableName,
    /// Field of the target row to display
    pub display_field: String,
    /// Named formatter overriding the plain lookup
    pub formatter: Option<Formatter>,
    /// Optional label prefixed to the display value ("Student: Alice")
    pub label: Option<String>,
    /// Resolve through a live point query instead of the cache
    pub use_api: bool,
}

impl FieldMapping {
    pub fn new(source_field: &str, target_table: TableName, display_field: &str) -> Self {
        Self {
            source_field: source_field.to_string(),
            target_table,
            display_field: display_field.to_string(),
            formatter: None,
            label: None,
            use_api: false,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn via_api(mut self) -> Self {
        self.use_api = true;
        self
    }

    fn fallback(&self) -> String {
        format!("Unknown {}", self.target_table.noun())
    }

    fn labeled(&self, display: String) -> String {
        match &self.label {
            Some(label) => format!("{label}: {display}"),
            None => display,
        }
    }
}

/// Resolves every mapping for one row against the cached tables.
///
/// Each field resolves independently; the result is keyed by the source
/// field name.
pub fn map_related_fields<S>(
    row: &Row,
    tables: &HashMap<TableName, TableEntity<S>>,
    mappings: &[FieldMapping],
) -> HashMap<String, String> {
    let mut resolved = HashMap::new();

    for mapping in mappings {
        let value = row.get(&mapping.source_field);
        let display = match mapping.formatter {
            Some(formatter) => formatter.apply(value, tables),
            None => resolve_relation(
                value,
                tables.get(&mapping.target_table),
                &mapping.display_field,
                "id",
                &mapping.fallback(),
            ),
        };
        resolved.insert(mapping.source_field.clone(), mapping.labeled(display));
    }

    resolved
}

/// Like [`map_related_fields`], but mappings flagged `use_api` (and without
/// a formatter) resolve through a point query, overriding the cached result.
///
/// Callers render the synchronous map first and merge this one in when it
/// arrives; a row's displayed values updating after initial render is
/// accepted eventual consistency.
pub async fn map_related_fields_async<S: TableStore>(
    row: &Row,
    tables: &HashMap<TableName, TableEntity<S>>,
    mappings: &[FieldMapping],
) -> HashMap<String, String> {
    let mut resolved = map_related_fields(row, tables, mappings);

    for mapping in mappings {
        if !mapping.use_api || mapping.formatter.is_some() {
            continue;
        }
        let Some(entity) = tables.get(&mapping.target_table) else {
            continue;
        };
        let display = resolve_relation_via_api(
            row.get(&mapping.source_field),
            &entity.api,
            &mapping.display_field,
            &mapping.fallback(),
        )
        .await;
        resolved.insert(mapping.source_field.clone(), mapping.labeled(display));
    }

    resolved
}

/// Default display rules for the bookings table.
pub fn booking_field_mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::new("student_id", TableName::Students, "name")
            .with_formatter(Formatter::StudentName)
            .with_label("Student")
            .via_api(),
        FieldMapping::new("package_id", TableName::Packages, "id")
            .with_formatter(Formatter::PackageSummary)
            .with_label("Package")
            .via_api(),
    ]
}

/// Default display rules for the lessons table.
pub fn lesson_field_mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::new("teacher_id", TableName::Teachers, "name")
            .with_formatter(Formatter::TeacherName)
            .with_label("Teacher")
            .via_api(),
        FieldMapping::new("booking_id", TableName::Bookings, "id")
            .with_formatter(Formatter::BookingSummary)
            .with_label("Booking")
            .via_api(),
    ]
}

/// Default display rules for a table (empty for tables without relations
/// worth mapping).
pub fn default_mappings(table: TableName) -> Vec<FieldMapping> {
    match table {
        TableName::Bookings => booking_field_mappings(),
        TableName::Lessons => lesson_field_mappings(),
        _ => Vec::new(),
    }
}
