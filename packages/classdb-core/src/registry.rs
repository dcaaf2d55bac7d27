//! Static table metadata.
//!
//! Declarative per-table catalogs: field lists, filter/sort options, related
//! tables. The registry is plain data passed explicitly into the loader;
//! nothing reads it from a global. A table without an entry is still legal,
//! and field inference takes over for it at load time.

use std::collections::HashMap;

use classdb_types::{
    FieldDef, FieldKind, FilterChoice, FilterOption, SortDirection, SortOption, TableName,
};

/// Metadata for one table.
#[derive(Debug, Clone, Default)]
pub struct TableMeta {
    pub fields: Vec<FieldDef>,
    pub filter_options: Vec<FilterOption>,
    pub sort_options: Vec<SortOption>,
    pub relationships: Vec<TableName>,
    pub description: String,
}

/// Registry of table metadata, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    entries: HashMap<TableName, TableMeta>,
}

impl TableRegistry {
    /// Registry with no entries (every load falls back to field inference).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, table: TableName) -> Option<&TableMeta> {
        self.entries.get(&table)
    }

    pub fn insert(&mut self, table: TableName, meta: TableMeta) {
        self.entries.insert(table, meta);
    }

    /// The built-in catalog for the school administration schema.
    pub fn builtin() -> Self {
        use FieldKind::*;
        use SortDirection::{Ascending, Descending};

        let mut registry = Self::default();

        registry.insert(
            TableName::Students,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("name", Text),
                    FieldDef::optional("email", Text),
                    FieldDef::optional("phone", Text),
                    FieldDef::required("languages", Array),
                    FieldDef::required("age", Number),
                    FieldDef::optional("user_id", Text),
                ],
                filter_options: vec![
                    FilterOption::multi("languages", "Language", language_choices()),
                    FilterOption::new(
                        "age",
                        "Age Group",
                        vec![
                            FilterChoice::new("18-25", "18-25"),
                            FilterChoice::new("26-35", "26-35"),
                            FilterChoice::new("36+", "36+"),
                        ],
                    ),
                ],
                sort_options: vec![
                    SortOption::new("name", "Name (A-Z)", Ascending),
                    SortOption::new("name", "Name (Z-A)", Descending),
                    SortOption::new("age", "Age (Low to High)", Ascending),
                    SortOption::new("age", "Age (High to Low)", Descending),
                ],
                relationships: vec![TableName::Bookings, TableName::StudentAvailabilityWindows],
                description: "Student profiles and contact information".to_string(),
            },
        );

        registry.insert(
            TableName::Teachers,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("name", Text),
                    FieldDef::optional("email", Text),
                    FieldDef::optional("phone", Text),
                    FieldDef::required("languages", Array),
                    FieldDef::optional("user_id", Text),
                ],
                filter_options: vec![FilterOption::multi(
                    "languages",
                    "Language",
                    language_choices(),
                )],
                sort_options: vec![
                    SortOption::new("name", "Name (A-Z)", Ascending),
                    SortOption::new("name", "Name (Z-A)", Descending),
                ],
                relationships: vec![TableName::Lessons],
                description: "Teacher profiles and contact information".to_string(),
            },
        );

        registry.insert(
            TableName::Equipment,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("type", Text),
                    FieldDef::required("model", Text),
                    FieldDef::required("size", Number),
                ],
                filter_options: vec![FilterOption::new(
                    "type",
                    "Type",
                    vec![
                        FilterChoice::new("kite", "Kite"),
                        FilterChoice::new("board", "Board"),
                        FilterChoice::new("bar", "Control Bar"),
                    ],
                )],
                sort_options: vec![
                    SortOption::new("type", "Type (A-Z)", Ascending),
                    SortOption::new("model", "Model (A-Z)", Ascending),
                    SortOption::new("size", "Size (Small to Large)", Ascending),
                    SortOption::new("size", "Size (Large to Small)", Descending),
                ],
                relationships: vec![],
                description: "Kite equipment: kites, bars, boards".to_string(),
            },
        );

        registry.insert(
            TableName::Packages,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("price", Price),
                    FieldDef::required("hours", Number),
                    FieldDef::required("capacity", Number),
                    FieldDef::optional("description", Text),
                    FieldDef::optional("created_at", Date),
                ],
                filter_options: vec![
                    FilterOption::new(
                        "hours",
                        "Duration",
                        vec![
                            FilterChoice::new(1, "1 Hour"),
                            FilterChoice::new(2, "2 Hours"),
                            FilterChoice::new(3, "3+ Hours"),
                        ],
                    ),
                    FilterOption::new(
                        "capacity",
                        "Group Size",
                        vec![
                            FilterChoice::new(1, "Individual"),
                            FilterChoice::new(2, "Pair"),
                            FilterChoice::new(3, "Small Group (3-5)"),
                            FilterChoice::new(6, "Large Group (6+)"),
                        ],
                    ),
                ],
                sort_options: vec![
                    SortOption::new("price", "Price (Low to High)", Ascending),
                    SortOption::new("price", "Price (High to Low)", Descending),
                    SortOption::new("hours", "Duration (Short to Long)", Ascending),
                    SortOption::new("hours", "Duration (Long to Short)", Descending),
                ],
                relationships: vec![TableName::Bookings],
                description: "Lesson package offerings and pricing".to_string(),
            },
        );

        registry.insert(
            TableName::Bookings,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("package_id", Number),
                    FieldDef::required("student_id", Number),
                    FieldDef::required("start_date", Date),
                    FieldDef::optional("created_at", Date),
                ],
                filter_options: vec![],
                sort_options: vec![
                    SortOption::new("start_date", "Date (Newest First)", Descending),
                    SortOption::new("start_date", "Date (Oldest First)", Ascending),
                    SortOption::new("created_at", "Booking Date (Newest First)", Descending),
                    SortOption::new("created_at", "Booking Date (Oldest First)", Ascending),
                ],
                relationships: vec![TableName::Lessons, TableName::Packages, TableName::Students],
                description: "Student bookings for lesson packages".to_string(),
            },
        );

        registry.insert(
            TableName::Sessions,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("equipment_ids", Array),
                    FieldDef::required("start_time", Date),
                    FieldDef::required("duration", Duration),
                ],
                filter_options: vec![FilterOption::new(
                    "duration",
                    "Duration",
                    vec![
                        FilterChoice::new(60, "1 Hour"),
                        FilterChoice::new(120, "2 Hours"),
                        FilterChoice::new(180, "3+ Hours"),
                    ],
                )],
                sort_options: vec![
                    SortOption::new("start_time", "Start Time (Newest First)", Descending),
                    SortOption::new("start_time", "Start Time (Oldest First)", Ascending),
                    SortOption::new("duration", "Duration (Short to Long)", Ascending),
                    SortOption::new("duration", "Duration (Long to Short)", Descending),
                ],
                relationships: vec![TableName::LessonSessions],
                description: "Individual learning sessions and their equipment".to_string(),
            },
        );

        registry.insert(
            TableName::Payments,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("cash", Boolean),
                    FieldDef::required("created_date", Date),
                    FieldDef::required("amount", Price),
                ],
                filter_options: vec![FilterOption::new(
                    "cash",
                    "Payment Type",
                    vec![
                        FilterChoice::new(true, "Cash"),
                        FilterChoice::new(false, "Card/Digital"),
                    ],
                )],
                sort_options: vec![
                    SortOption::new("created_date", "Date (Newest First)", Descending),
                    SortOption::new("created_date", "Date (Oldest First)", Ascending),
                    SortOption::new("amount", "Amount (High to Low)", Descending),
                    SortOption::new("amount", "Amount (Low to High)", Ascending),
                ],
                relationships: vec![TableName::Lessons],
                description: "Payment records for lessons".to_string(),
            },
        );

        registry.insert(
            TableName::PostLessons,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("student_confirmation", Boolean),
                ],
                filter_options: vec![FilterOption::new(
                    "student_confirmation",
                    "Confirmation",
                    vec![
                        FilterChoice::new(true, "Confirmed"),
                        FilterChoice::new(false, "Not Confirmed"),
                    ],
                )],
                sort_options: vec![],
                relationships: vec![TableName::Lessons],
                description: "Post-lesson feedback and confirmations".to_string(),
            },
        );

        registry.insert(
            TableName::AvailabilityWindows,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("start_date", Date),
                    FieldDef::required("end_date", Date),
                    FieldDef::optional("created_at", Date),
                ],
                filter_options: vec![],
                sort_options: vec![
                    SortOption::new("start_date", "Start Date (Newest First)", Descending),
                    SortOption::new("start_date", "Start Date (Oldest First)", Ascending),
                ],
                relationships: vec![TableName::StudentAvailabilityWindows],
                description: "Time periods available for scheduling".to_string(),
            },
        );

        registry.insert(
            TableName::StudentAvailabilityWindows,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("student_id", Number),
                    FieldDef::required("availability_window_id", Number),
                ],
                filter_options: vec![],
                sort_options: vec![],
                relationships: vec![TableName::Students, TableName::AvailabilityWindows],
                description: "Links students to their availability windows".to_string(),
            },
        );

        registry.insert(
            TableName::Lessons,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("teacher_id", Number),
                    FieldDef::required("booking_id", Number),
                    FieldDef::optional("payment_id", Number),
                    FieldDef::optional("post_lesson_id", Number),
                    FieldDef::required("status", Status),
                    FieldDef::optional("created_at", Date),
                ],
                filter_options: vec![FilterOption::new(
                    "status",
                    "Status",
                    vec![
                        FilterChoice::new("created", "Created"),
                        FilterChoice::new("confirmed", "Confirmed"),
                        FilterChoice::new("cancelled", "Cancelled"),
                        FilterChoice::new("completed", "Completed"),
                    ],
                )],
                sort_options: vec![
                    SortOption::new("created_at", "Created Date (Newest First)", Descending),
                    SortOption::new("created_at", "Created Date (Oldest First)", Ascending),
                    SortOption::new("status", "Status (A-Z)", Ascending),
                ],
                relationships: vec![
                    TableName::Teachers,
                    TableName::Bookings,
                    TableName::Payments,
                    TableName::PostLessons,
                    TableName::LessonSessions,
                ],
                description: "Lessons connecting teachers, bookings, and sessions".to_string(),
            },
        );

        registry.insert(
            TableName::LessonSessions,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("lesson_id", Number),
                    FieldDef::required("session_id", Number),
                ],
                filter_options: vec![],
                sort_options: vec![],
                relationships: vec![TableName::Lessons, TableName::Sessions],
                description: "Links lessons to their individual sessions".to_string(),
            },
        );

        registry.insert(
            TableName::Admins,
            TableMeta {
                fields: vec![
                    FieldDef::key("id", Number),
                    FieldDef::required("user_id", Text),
                    FieldDef::required("role", Text),
                ],
                filter_options: vec![FilterOption::new(
                    "role",
                    "Role",
                    vec![
                        FilterChoice::new("admin", "Administrator"),
                        FilterChoice::new("manager", "Manager"),
                        FilterChoice::new("viewer", "Viewer"),
                    ],
                )],
                sort_options: vec![SortOption::new("role", "Role (A-Z)", Ascending)],
                relationships: vec![],
                description: "Administrator accounts".to_string(),
            },
        );

        registry
    }
}

fn language_choices() -> Vec<FilterChoice> {
    vec![
        FilterChoice::new("english", "English"),
        FilterChoice::new("spanish", "Spanish"),
        FilterChoice::new("french", "French"),
        FilterChoice::new("german", "German"),
    ]
}
