//! Typed domain records.
//!
//! One struct per known table, mirroring the remote schema with snake_case
//! columns. Rows deserialize into these best-effort; anything that does not
//! fit falls back to the dynamic [`Row`] form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::table_name::TableName;

/// Languages offered for lessons (remote Postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    German,
}

/// Lesson lifecycle states (remote Postgres enum, default `created`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Created,
    Confirmed,
    Cancelled,
    Completed,
}

/// Equipment categories (remote Postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    Kite,
    Board,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub languages: Vec<Language>,
    pub age: i64,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub languages: Vec<Language>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    pub model: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub price: i64,
    pub hours: i64,
    pub capacity: i64,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub package_id: i64,
    pub student_id: i64,
    pub start_date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub equipment_ids: Vec<i64>,
    pub start_time: DateTime<Utc>,
    /// In minutes
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    /// `false` means bank transfer
    pub cash: bool,
    pub created_date: DateTime<Utc>,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostLesson {
    pub id: i64,
    pub student_confirmation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAvailabilityWindow {
    pub id: i64,
    pub student_id: i64,
    pub availability_window_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub teacher_id: i64,
    pub booking_id: i64,
    pub payment_id: Option<i64>,
    pub post_lesson_id: Option<i64>,
    pub status: LessonStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSession {
    pub id: i64,
    pub lesson_id: i64,
    pub session_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub user_id: String,
    pub role: String,
}

/// A row of a known table, or the dynamic fallback when the row does not
/// match the expected shape (schema drift, partially filled prototypes).
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Admin(Admin),
    AvailabilityWindow(AvailabilityWindow),
    Booking(Booking),
    Equipment(Equipment),
    Lesson(Lesson),
    LessonSession(LessonSession),
    Package(Package),
    Payment(Payment),
    PostLesson(PostLesson),
    Session(Session),
    Student(Student),
    StudentAvailabilityWindow(StudentAvailabilityWindow),
    Teacher(Teacher),
    Dynamic(Row),
}

impl Record {
    /// Deserializes a row into its table's record type, falling back to
    /// `Dynamic` when the row does not fit.
    pub fn from_row(table: TableName, row: Row) -> Self {
        fn parse<T: serde::de::DeserializeOwned>(row: &Row) -> Option<T> {
            serde_json::from_value(row.to_value()).ok()
        }

        let record = match table {
            TableName::Admins => parse(&row).map(Record::Admin),
            TableName::AvailabilityWindows => parse(&row).map(Record::AvailabilityWindow),
            TableName::Bookings => parse(&row).map(Record::Booking),
            TableName::Equipment => parse(&row).map(Record::Equipment),
            TableName::LessonSessions => parse(&row).map(Record::LessonSession),
            TableName::Lessons => parse(&row).map(Record::Lesson),
            TableName::Packages => parse(&row).map(Record::Package),
            TableName::Payments => parse(&row).map(Record::Payment),
            TableName::PostLessons => parse(&row).map(Record::PostLesson),
            TableName::Sessions => parse(&row).map(Record::Session),
            TableName::Students => parse(&row).map(Record::Student),
            TableName::StudentAvailabilityWindows => {
                parse(&row).map(Record::StudentAvailabilityWindow)
            }
            TableName::Teachers => parse(&row).map(Record::Teacher),
        };

        record.unwrap_or(Record::Dynamic(row))
    }
}
