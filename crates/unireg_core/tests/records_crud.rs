use rusqlite::Connection;
use unireg_core::db::open_db_in_memory;
use unireg_core::{Filters, Major, Records, RepoError, ValueSet};

fn seed_major(conn: &Connection, name: &str) -> Major {
    Records::<Major>::new(conn)
        .add(&ValueSet::new().set("major_name", name.to_string()))
        .unwrap()
}

#[test]
fn find_all_with_empty_filters_returns_everything_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_major(&conn, "Economics");
    let second = seed_major(&conn, "Law");

    let all = Records::<Major>::new(&conn)
        .find_all(&Filters::new())
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);
}

#[test]
fn find_all_matches_exact_equality_conjunction_only() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);

    let by_name = records
        .find_all(&Filters::new().eq("major_name", "Law".to_string()))
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].major_name, "Law");

    // Both predicates must hold; the name exists but the count does not.
    let contradictory = records
        .find_all(
            &Filters::new()
                .eq("major_name", "Law".to_string())
                .eq("count_students", 7),
        )
        .unwrap();
    assert!(contradictory.is_empty());
}

#[test]
fn unknown_filter_column_is_rejected_before_sql_runs() {
    let conn = open_db_in_memory().unwrap();
    let records = Records::<Major>::new(&conn);

    let err = records
        .find_all(&Filters::new().eq("nonexistent", 1))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::UnknownColumn { table: "majors", ref column } if column == "nonexistent"
    ));
}

#[test]
fn find_one_requires_exactly_one_match() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);

    let err = records
        .find_one(&Filters::new().eq("major_name", "Medicine".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // Both seeded rows share count_students = 0.
    let err = records
        .find_one(&Filters::new().eq("count_students", 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::BadRequest(_)));

    let found = records
        .find_one(&Filters::new().eq("major_name", "Law".to_string()))
        .unwrap();
    assert_eq!(found.major_name, "Law");
}

#[test]
fn find_one_or_none_returns_explicit_absence() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);

    let none = records
        .find_one_or_none(&Filters::new().eq("major_name", "Medicine".to_string()))
        .unwrap();
    assert!(none.is_none());

    let some = records
        .find_one_or_none(&Filters::new().eq("major_name", "Economics".to_string()))
        .unwrap();
    assert_eq!(some.unwrap().major_name, "Economics");

    let err = records
        .find_one_or_none(&Filters::new().eq("count_students", 0))
        .unwrap_err();
    assert!(matches!(err, RepoError::BadRequest(_)));
}

#[test]
fn add_returns_persisted_record_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let major = Records::<Major>::new(&conn)
        .add(
            &ValueSet::new()
                .set("major_name", "Informatics".to_string())
                .set("major_description", Some("Computing".to_string())),
        )
        .unwrap();

    assert!(major.id >= 1);
    assert_eq!(major.major_name, "Informatics");
    assert_eq!(major.major_description.as_deref(), Some("Computing"));
    assert_eq!(major.count_students, 0);
}

#[test]
fn duplicate_unique_key_on_add_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");

    let err = Records::<Major>::new(&conn)
        .add(&ValueSet::new().set("major_name", "Economics".to_string()))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[test]
fn update_applies_values_to_every_match_and_returns_them() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);

    let updated = records
        .update(
            &Filters::new().eq("count_students", 0),
            &ValueSet::new().set("major_description", Some("pending review".to_string())),
        )
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert!(updated
        .iter()
        .all(|major| major.major_description.as_deref() == Some("pending review")));

    let unmatched = records
        .update(
            &Filters::new().eq("major_name", "Medicine".to_string()),
            &ValueSet::new().set("major_description", Some("x".to_string())),
        )
        .unwrap();
    assert!(unmatched.is_empty());

    let err = records
        .update(&Filters::new(), &ValueSet::new())
        .unwrap_err();
    assert!(matches!(err, RepoError::BadRequest(_)));
}

#[test]
fn delete_with_empty_filters_requires_the_delete_all_flag() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);

    let err = records.delete(&Filters::new(), false).unwrap_err();
    assert!(matches!(err, RepoError::BadRequest(_)));
    assert_eq!(records.find_all(&Filters::new()).unwrap().len(), 2);

    let deletion = records.delete(&Filters::new(), true).unwrap();
    assert_eq!(deletion.count, 2);
    assert_eq!(deletion.records.len(), 2);
    assert!(records.find_all(&Filters::new()).unwrap().is_empty());
}

#[test]
fn filtered_delete_returns_removed_records_and_count() {
    let conn = open_db_in_memory().unwrap();
    seed_major(&conn, "Economics");
    seed_major(&conn, "Law");

    let records = Records::<Major>::new(&conn);
    let deletion = records
        .delete(&Filters::new().eq("major_name", "Law".to_string()), false)
        .unwrap();

    assert_eq!(deletion.count, 1);
    assert_eq!(deletion.records[0].major_name, "Law");

    let remaining = records.find_all(&Filters::new()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].major_name, "Economics");
}
