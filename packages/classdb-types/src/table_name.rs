//! Table allow-list.
//!
//! The set of remote tables the client is permitted to query is a closed
//! enumeration. Any name outside this list is rejected before a request is
//! made, so a typo in a page never turns into a stray network call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A table name outside the allow-list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("table '{name}' is not in the allowed tables list")]
pub struct UnknownTableError {
    pub name: String,
}

/// Permitted remote table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Admins,
    AvailabilityWindows,
    Bookings,
    Equipment,
    LessonSessions,
    Lessons,
    Packages,
    Payments,
    PostLessons,
    Sessions,
    StudentAvailabilityWindows,
    Students,
    Teachers,
}

impl TableName {
    /// Every permitted table.
    pub const ALL: [TableName; 13] = [
        TableName::Admins,
        TableName::AvailabilityWindows,
        TableName::Bookings,
        TableName::Equipment,
        TableName::LessonSessions,
        TableName::Lessons,
        TableName::Packages,
        TableName::Payments,
        TableName::PostLessons,
        TableName::Sessions,
        TableName::StudentAvailabilityWindows,
        TableName::Students,
        TableName::Teachers,
    ];

    /// Tables shown in the admin area.
    pub const ADMIN_TABLES: [TableName; 7] = [
        TableName::Bookings,
        TableName::Equipment,
        TableName::Lessons,
        TableName::Packages,
        TableName::Sessions,
        TableName::Students,
        TableName::Teachers,
    ];

    /// Tables a student session needs.
    pub const STUDENT_TABLES: [TableName; 4] = [
        TableName::Students,
        TableName::Packages,
        TableName::Bookings,
        TableName::Lessons,
    ];

    /// Tables a teacher session needs.
    pub const TEACHER_TABLES: [TableName; 2] = [TableName::Lessons, TableName::Sessions];

    /// The remote table name.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Admins => "admins",
            TableName::AvailabilityWindows => "availability_windows",
            TableName::Bookings => "bookings",
            TableName::Equipment => "equipment",
            TableName::LessonSessions => "lesson_sessions",
            TableName::Lessons => "lessons",
            TableName::Packages => "packages",
            TableName::Payments => "payments",
            TableName::PostLessons => "post_lessons",
            TableName::Sessions => "sessions",
            TableName::StudentAvailabilityWindows => "student_availability_windows",
            TableName::Students => "students",
            TableName::Teachers => "teachers",
        }
    }

    /// Singular noun used in fallback display strings ("Unknown student").
    pub fn noun(self) -> &'static str {
        match self {
            TableName::Admins => "admin",
            TableName::AvailabilityWindows => "availability window",
            TableName::Bookings => "booking",
            TableName::Equipment => "equipment",
            TableName::LessonSessions => "lesson session",
            TableName::Lessons => "lesson",
            TableName::Packages => "package",
            TableName::Payments => "payment",
            TableName::PostLessons => "post-lesson",
            TableName::Sessions => "session",
            TableName::StudentAvailabilityWindows => "student availability window",
            TableName::Students => "student",
            TableName::Teachers => "teacher",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = UnknownTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTableError {
                name: s.to_string(),
            })
    }
}
