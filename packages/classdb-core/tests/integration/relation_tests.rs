//! Relation resolution end to end.

use std::sync::Arc;

use serde_json::json;

use classdb_core::relation::{
    booking_field_mappings, default_mappings, lesson_field_mappings, map_related_fields,
    map_related_fields_async, resolve_relation, resolve_relation_via_api, FieldMapping,
};
use classdb_core::{SessionTables, TableRegistry, TableStore};
use classdb_types::TableName;

use super::common::{row, seeded_store};

#[tokio::test]
async fn test_booking_student_ids_resolve_in_row_order() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session
        .fetch_tables(&[TableName::Bookings, TableName::Students])
        .await
        .unwrap();

    let names = session
        .with_tables(|tables| {
            let bookings = &tables[&TableName::Bookings];
            bookings
                .data
                .iter()
                .map(|booking| {
                    resolve_relation(
                        booking.get("student_id"),
                        tables.get(&TableName::Students),
                        "name",
                        "id",
                        "Unknown student",
                    )
                })
                .collect::<Vec<_>>()
        })
        .unwrap();

    assert_eq!(names, vec!["Alice", "Bob", "Alice"]);
}

#[tokio::test]
async fn test_missing_relation_falls_back_without_panicking() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session.fetch_tables(&[TableName::Students]).await.unwrap();

    let display = session
        .with_tables(|tables| {
            resolve_relation(
                Some(&json!(999)),
                tables.get(&TableName::Students),
                "name",
                "id",
                "Unknown student",
            )
        })
        .unwrap();
    assert_eq!(display, "Unknown student");

    // Absent table and null value degrade the same way.
    let absent: String = session
        .with_tables(|tables| {
            resolve_relation(
                Some(&json!(1)),
                tables.get(&TableName::Teachers),
                "name",
                "id",
                "Unknown teacher",
            )
        })
        .unwrap();
    assert_eq!(absent, "Unknown teacher");
}

#[tokio::test]
async fn test_booking_mappings_prefix_labels() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session
        .fetch_tables(&[TableName::Bookings, TableName::Students, TableName::Packages])
        .await
        .unwrap();

    let resolved = session
        .with_tables(|tables| {
            let booking = &tables[&TableName::Bookings].data[0];
            map_related_fields(booking, tables, &booking_field_mappings())
        })
        .unwrap();

    assert_eq!(resolved["student_id"], "Student: Alice");
    assert_eq!(resolved["package_id"], "Package: 2hrs, 3 ppl");
}

#[tokio::test]
async fn test_booking_summary_degrades_half_by_half() {
    let store = seeded_store();
    store.seed(
        TableName::Lessons,
        vec![row(json!({
            "id": 1, "teacher_id": 1, "booking_id": 100, "payment_id": null,
            "post_lesson_id": null, "status": "created", "created_at": null
        }))],
    );
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());

    // Both halves available.
    session
        .fetch_tables(&[
            TableName::Lessons,
            TableName::Bookings,
            TableName::Packages,
            TableName::Students,
            TableName::Teachers,
        ])
        .await
        .unwrap();
    let resolved = session
        .with_tables(|tables| {
            let lesson = &tables[&TableName::Lessons].data[0];
            map_related_fields(lesson, tables, &lesson_field_mappings())
        })
        .unwrap();
    assert_eq!(resolved["booking_id"], "Booking: 3 ppl, 2hrs - Alice");
    assert_eq!(resolved["teacher_id"], "Teacher: Fernando");

    // Without the packages table the student half still renders.
    let partial_session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());
    partial_session
        .fetch_tables(&[TableName::Lessons, TableName::Bookings, TableName::Students])
        .await
        .unwrap();
    let partial = partial_session
        .with_tables(|tables| {
            let lesson = &tables[&TableName::Lessons].data[0];
            map_related_fields(lesson, tables, &lesson_field_mappings())
        })
        .unwrap();
    assert_eq!(partial["booking_id"], "Booking: Alice");

    // With neither half resolvable the numbered fallback appears.
    let bare_session = SessionTables::new(store, TableRegistry::builtin());
    bare_session
        .fetch_tables(&[TableName::Lessons, TableName::Bookings])
        .await
        .unwrap();
    let bare = bare_session
        .with_tables(|tables| {
            let lesson = &tables[&TableName::Lessons].data[0];
            map_related_fields(lesson, tables, &lesson_field_mappings())
        })
        .unwrap();
    assert_eq!(bare["booking_id"], "Booking: Booking #100");
}

#[tokio::test]
async fn test_api_resolution_sees_fresh_rows_past_the_cache() {
    let store = seeded_store();
    let session = SessionTables::new(Arc::clone(&store), TableRegistry::builtin());
    session
        .fetch_tables(&[TableName::Bookings, TableName::Students])
        .await
        .unwrap();

    // Another session renames the student; the snapshot is stale.
    store
        .update_by_id(
            TableName::Students,
            &json!(1),
            row(json!({"name": "Alicia"})),
        )
        .await
        .unwrap();

    let (cached, fresh) = {
        let mapping = FieldMapping::new("student_id", TableName::Students, "name").via_api();
        let booking = session
            .with_table(TableName::Bookings, |t| t.data[0].clone())
            .unwrap();

        let cached = session
            .with_tables(|tables| {
                map_related_fields(&booking, tables, std::slice::from_ref(&mapping))
            })
            .unwrap();

        let tables_snapshot = session
            .with_tables(|tables| tables.clone())
            .unwrap();
        let fresh =
            map_related_fields_async(&booking, &tables_snapshot, std::slice::from_ref(&mapping))
                .await;
        (cached, fresh)
    };

    assert_eq!(cached["student_id"], "Alice");
    assert_eq!(fresh["student_id"], "Alicia");
}

#[tokio::test]
async fn test_api_resolution_falls_back_on_missing_row() {
    let store = seeded_store();
    let session = SessionTables::new(store, TableRegistry::builtin());
    session.fetch_tables(&[TableName::Students]).await.unwrap();

    let api = session
        .with_table(TableName::Students, |t| t.api.clone())
        .unwrap();
    let display =
        resolve_relation_via_api(Some(&json!(999)), &api, "name", "Unknown student").await;
    assert_eq!(display, "Unknown student");
}

#[test]
fn test_default_mappings_cover_relation_heavy_tables() {
    assert_eq!(default_mappings(TableName::Bookings).len(), 2);
    assert_eq!(default_mappings(TableName::Lessons).len(), 2);
    assert!(default_mappings(TableName::Equipment).is_empty());
}
