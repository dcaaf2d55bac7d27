//! Free-text search, filtering, and sorting over cached rows.
//!
//! [`apply_view`] is a pure function of its four inputs and recomputes the
//! whole view on every call; there is no incremental update.

use std::cmp::Ordering;

use serde_json::Value;

use classdb_types::row::{as_number, display_string, loosely_equal};
use classdb_types::{Row, SortDirection};

/// Fields searched when a table does not configure its own.
pub const DEFAULT_SEARCH_FIELDS: [&str; 3] = ["name", "first_name", "last_name"];

/// One active filter constraint.
///
/// A criterion matches when the row's field equals (loosely) any of the
/// candidate values; candidate values shaped like `"18-25"` or `"36+"` act
/// as inclusive numeric ranges against numeric fields, and array-valued row
/// fields match by membership.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriterion {
    pub field: String,
    pub values: Vec<Value>,
    pub multi_select: bool,
}

impl FilterCriterion {
    pub fn single(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            values: vec![value.into()],
            multi_select: false,
        }
    }

    pub fn multi(field: &str, values: Vec<Value>) -> Self {
        Self {
            field: field.to_string(),
            values,
            multi_select: true,
        }
    }
}

/// The set of active filters: at most one criterion per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    criteria: Vec<FilterCriterion>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterCriterion> {
        self.criteria.iter()
    }

    pub fn get(&self, field: &str) -> Option<&FilterCriterion> {
        self.criteria.iter().find(|c| c.field == field)
    }

    /// Activates a criterion, replacing any existing one on the same field.
    pub fn set(&mut self, criterion: FilterCriterion) {
        match self.criteria.iter_mut().find(|c| c.field == criterion.field) {
            Some(existing) => *existing = criterion,
            None => self.criteria.push(criterion),
        }
    }

    /// Adds or removes one value of a multi-select criterion.
    ///
    /// Toggling the last value off removes the criterion entirely.
    pub fn toggle_value(&mut self, field: &str, value: Value) {
        match self.criteria.iter_mut().find(|c| c.field == field) {
            Some(existing) => {
                match existing.values.iter().position(|v| loosely_equal(v, &value)) {
                    Some(index) => {
                        existing.values.remove(index);
                    }
                    None => existing.values.push(value),
                }
                if existing.values.is_empty() {
                    self.remove(field);
                }
            }
            None => self.set(FilterCriterion::multi(field, vec![value])),
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.criteria.retain(|c| c.field != field);
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }
}

/// The single active ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SortCriterion {
    pub field: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

/// Applies search, then filters, then the sort, producing a new row set.
///
/// An empty or whitespace-only search term passes every row. Filters are a
/// conjunction in the order listed. Ties under the sort keep their input
/// order in practice (the underlying sort is stable), but that is an
/// implementation detail, not a promise.
pub fn apply_view(
    rows: &[Row],
    search_term: &str,
    search_fields: &[&str],
    filters: &FilterSet,
    sort: Option<&SortCriterion>,
) -> Vec<Row> {
    let term = search_term.trim().to_lowercase();

    let mut result: Vec<Row> = rows
        .iter()
        .filter(|row| term.is_empty() || matches_search(row, &term, search_fields))
        .filter(|row| filters.iter().all(|criterion| matches_criterion(row, criterion)))
        .cloned()
        .collect();

    if let Some(sort) = sort {
        sort_rows(&mut result, sort);
    }

    result
}

/// Case-insensitive substring match over any of the search fields.
fn matches_search(row: &Row, term_lower: &str, search_fields: &[&str]) -> bool {
    search_fields.iter().any(|field| {
        row.get(field)
            .filter(|value| !value.is_null())
            .map(|value| display_string(value).to_lowercase().contains(term_lower))
            .unwrap_or(false)
    })
}

/// Inclusive numeric range parsed from a filter value.
enum RangeTest {
    /// "18-25"
    Bounded(f64, f64),
    /// "36+"
    Lower(f64),
}

fn parse_range(value: &Value) -> Option<RangeTest> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    if let Some(min) = s.strip_suffix('+') {
        return min.trim().parse().ok().map(RangeTest::Lower);
    }
    let (min, max) = s.split_once('-')?;
    Some(RangeTest::Bounded(
        min.trim().parse().ok()?,
        max.trim().parse().ok()?,
    ))
}

fn matches_criterion(row: &Row, criterion: &FilterCriterion) -> bool {
    let Some(actual) = row.get(&criterion.field) else {
        return false;
    };

    match actual {
        // Array-valued fields match by membership, never by whole-array
        // equality.
        Value::Array(items) => criterion.values.iter().any(|candidate| {
            items.iter().any(|item| loosely_equal(item, candidate))
        }),
        actual => criterion.values.iter().any(|candidate| {
            match (parse_range(candidate), as_number(actual)) {
                (Some(RangeTest::Bounded(min, max)), Some(n)) => n >= min && n <= max,
                (Some(RangeTest::Lower(min)), Some(n)) => n >= min,
                _ => loosely_equal(actual, candidate),
            }
        }),
    }
}

/// Sorts in place by one key. Missing and null values always sort last,
/// whatever the direction.
pub fn sort_rows(rows: &mut [Row], sort: &SortCriterion) {
    rows.sort_by(|a, b| {
        let left = a.get(&sort.field).filter(|v| !v.is_null());
        let right = b.get(&sort.field).filter(|v| !v.is_null());
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = compare_values(x, y);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    });
}

/// Numbers compare arithmetically (numeric strings included), strings
/// case-insensitively; everything else falls back to its display string.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => display_string(a).cmp(&display_string(b)),
    }
}
