//! Value formatters.
//!
//! Each formatter degrades to a caller-supplied default instead of failing:
//! presentation never turns a malformed cell into an error.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde_json::Value;

use classdb_types::row::{as_number, display_string};
use classdb_types::TableName;

/// Default marker for values a formatter cannot interpret.
pub const DEFAULT_PLACEHOLDER: &str = "-";

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parses a timestamp value: RFC 3339, a few naive fallbacks, or epoch
/// milliseconds.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Some(naive.and_utc());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc());
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
            }
            None
        }
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        _ => None,
    }
}

/// Formats a timestamp as "20-May : 14:30".
pub fn format_date(value: Option<&Value>, default: &str) -> String {
    let Some(dt) = value.and_then(parse_date) else {
        return default.to_string();
    };
    format!(
        "{}-{} : {:02}:{:02}",
        dt.day(),
        MONTH_ABBR[dt.month0() as usize],
        dt.hour(),
        dt.minute()
    )
}

/// Formats a timestamp as `YYYY-MM-DD` for date inputs; empty when invalid.
pub fn format_date_for_input(value: Option<&Value>) -> String {
    value
        .and_then(parse_date)
        .map(|dt| format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day()))
        .unwrap_or_default()
}

/// Formats a monetary amount with a currency symbol, thousands grouping,
/// and two decimals ("$1,234.50").
pub fn format_currency(value: Option<&Value>, symbol: &str, default: &str) -> String {
    let Some(amount) = value.and_then(as_number) else {
        return default.to_string();
    };
    if !amount.is_finite() {
        return default.to_string();
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(total_cents / 100);
    format!("{sign}{symbol}{whole}.{:02}", total_cents % 100)
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = n % 1000;
        n /= 1000;
        if n == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(",")
}

/// Formats a duration in minutes.
///
/// Verbose: "2 hours 30 minutes" / "30 minutes". Compact: "2h 30m" / "30m".
pub fn format_duration(value: Option<&Value>, verbose: bool, default: &str) -> String {
    let Some(minutes) = value.and_then(as_number) else {
        return default.to_string();
    };
    if !minutes.is_finite() || minutes < 0.0 {
        return default.to_string();
    }

    let minutes = minutes.round() as u64;
    let hours = minutes / 60;
    let remaining = minutes % 60;

    if verbose {
        let plural = |n: u64, unit: &str| {
            if n == 1 {
                format!("{n} {unit}")
            } else {
                format!("{n} {unit}s")
            }
        };
        match (hours, remaining) {
            (0, m) => plural(m, "minute"),
            (h, 0) => plural(h, "hour"),
            (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "minute")),
        }
    } else {
        match (hours, remaining) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}

/// Display text and style class for one status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub class_name: &'static str,
}

/// Status vocabulary of one table.
pub type StatusMap = &'static [(&'static str, StatusStyle)];

pub const UNKNOWN_STATUS: StatusStyle = StatusStyle {
    label: "Unknown",
    class_name: "text-gray-400",
};

pub const BOOKING_STATUS: StatusMap = &[
    (
        "pending",
        StatusStyle {
            label: "Pending",
            class_name: "text-yellow-500 font-medium",
        },
    ),
    (
        "confirmed",
        StatusStyle {
            label: "Confirmed",
            class_name: "text-green-500 font-medium",
        },
    ),
    (
        "cancelled",
        StatusStyle {
            label: "Cancelled",
            class_name: "text-red-500 font-medium",
        },
    ),
    (
        "completed",
        StatusStyle {
            label: "Completed",
            class_name: "text-blue-500 font-medium",
        },
    ),
];

pub const PAYMENT_STATUS: StatusMap = &[
    (
        "unpaid",
        StatusStyle {
            label: "Unpaid",
            class_name: "text-yellow-500 font-medium",
        },
    ),
    (
        "partial",
        StatusStyle {
            label: "Partial",
            class_name: "text-blue-500 font-medium",
        },
    ),
    (
        "paid",
        StatusStyle {
            label: "Paid",
            class_name: "text-green-500 font-medium",
        },
    ),
    (
        "refunded",
        StatusStyle {
            label: "Refunded",
            class_name: "text-purple-500 font-medium",
        },
    ),
];

pub const LESSON_STATUS: StatusMap = &[
    (
        "created",
        StatusStyle {
            label: "Created",
            class_name: "text-yellow-500 font-medium",
        },
    ),
    (
        "confirmed",
        StatusStyle {
            label: "Confirmed",
            class_name: "text-blue-500 font-medium",
        },
    ),
    (
        "cancelled",
        StatusStyle {
            label: "Cancelled",
            class_name: "text-red-500 font-medium",
        },
    ),
    (
        "completed",
        StatusStyle {
            label: "Completed",
            class_name: "text-green-500 font-medium",
        },
    ),
];

/// Looks a status value up in a table's vocabulary; foreign values get the
/// `Unknown` style.
pub fn format_status(value: Option<&Value>, map: StatusMap) -> StatusStyle {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return UNKNOWN_STATUS;
    };
    let key = display_string(value);
    map.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, style)| *style)
        .unwrap_or(UNKNOWN_STATUS)
}

/// The status vocabulary used by a table's status column.
pub fn status_map_for(table: TableName) -> StatusMap {
    match table {
        TableName::Bookings => BOOKING_STATUS,
        TableName::Lessons => LESSON_STATUS,
        TableName::Payments => PAYMENT_STATUS,
        _ => &[],
    }
}
