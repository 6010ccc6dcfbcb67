use rusqlite::Connection;
use unireg_core::db::open_db_in_memory;
use unireg_core::{Catalog, MajorRepository, ReconcilePhase, RepoError, SqliteMajorRepository};

fn example_catalog() -> Catalog {
    Catalog::new()
        .with_major("Economics", Vec::<String>::new())
        .with_major("Engineering", ["InstA"])
}

fn institute_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT institute_name FROM institutes ORDER BY institute_name;")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

#[test]
fn empty_database_converges_in_exactly_three_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = example_catalog();
    let mut repo = SqliteMajorRepository::new(&mut conn);

    let first = repo.reconcile(&catalog).unwrap();
    assert_eq!(first.phase, ReconcilePhase::Majors);
    assert!(!first.synced);
    let mut added = first.added.clone();
    added.sort();
    assert_eq!(added, ["Economics", "Engineering"]);
    assert!(first.deleted.is_empty());

    let second = repo.reconcile(&catalog).unwrap();
    assert_eq!(second.phase, ReconcilePhase::Institutes);
    assert!(!second.synced);
    assert_eq!(second.added, ["InstA"]);
    assert!(second.deleted.is_empty());

    let third = repo.reconcile(&catalog).unwrap();
    assert_eq!(third.phase, ReconcilePhase::Institutes);
    assert!(third.synced);
    assert!(third.added.is_empty());
    assert!(third.deleted.is_empty());
}

#[test]
fn reconcile_is_idempotent_after_convergence() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = example_catalog();
    let mut repo = SqliteMajorRepository::new(&mut conn);

    repo.reconcile(&catalog).unwrap();
    repo.reconcile(&catalog).unwrap();

    for _ in 0..3 {
        let report = repo.reconcile(&catalog).unwrap();
        assert!(report.synced);
        assert!(report.added.is_empty());
        assert!(report.deleted.is_empty());
    }
}

#[test]
fn stale_major_is_removed_together_with_its_institutes() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let catalog = Catalog::new().with_major("Engineering", ["InstA"]);
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&catalog).unwrap();
        repo.reconcile(&catalog).unwrap();
    }
    assert_eq!(institute_names(&conn), ["InstA"]);

    let report = {
        let replacement = Catalog::new().with_major("Economics", Vec::<String>::new());
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&replacement).unwrap()
    };

    assert_eq!(report.phase, ReconcilePhase::Majors);
    assert_eq!(report.added, ["Economics"]);
    assert_eq!(report.deleted, ["Engineering"]);
    // The dependent institute went first; nothing dangles.
    assert!(institute_names(&conn).is_empty());
}

#[test]
fn major_drift_defers_institute_reconciliation_to_the_next_call() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let catalog = example_catalog();
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&catalog).unwrap();
        repo.reconcile(&catalog).unwrap();
    }

    // One catalog change touches both levels: a new major appears and
    // Engineering's institute list is rewritten.
    let drifted = Catalog::new()
        .with_major("Economics", Vec::<String>::new())
        .with_major("Engineering", ["InstB"])
        .with_major("Law", Vec::<String>::new());

    let first = {
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&drifted).unwrap()
    };
    assert_eq!(first.phase, ReconcilePhase::Majors);
    assert_eq!(first.added, ["Law"]);
    assert!(first.deleted.is_empty());
    // Institutes were not touched in the majors pass.
    assert_eq!(institute_names(&conn), ["InstA"]);

    let second = {
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&drifted).unwrap()
    };
    assert_eq!(second.phase, ReconcilePhase::Institutes);
    assert_eq!(second.added, ["InstB"]);
    assert_eq!(second.deleted, ["InstA"]);
    assert_eq!(institute_names(&conn), ["InstB"]);
}

#[test]
fn reconciled_rows_start_with_zero_counters() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let catalog = example_catalog();
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&catalog).unwrap();
        repo.reconcile(&catalog).unwrap();
    }

    let major_counts: i64 = conn
        .query_row("SELECT SUM(count_students) FROM majors;", [], |row| {
            row.get(0)
        })
        .unwrap();
    let institute_counts: i64 = conn
        .query_row("SELECT SUM(count_students) FROM institutes;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(major_counts, 0);
    assert_eq!(institute_counts, 0);
}

#[test]
fn structurally_invalid_catalog_is_rejected_without_mutation() {
    let mut conn = open_db_in_memory().unwrap();
    let duplicate = Catalog::new()
        .with_major("Economics", ["Shared"])
        .with_major("Law", ["Shared"]);

    let err = {
        let mut repo = SqliteMajorRepository::new(&mut conn);
        repo.reconcile(&duplicate).unwrap_err()
    };
    assert!(matches!(err, RepoError::BadRequest(_)));

    let majors: i64 = conn
        .query_row("SELECT COUNT(*) FROM majors;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(majors, 0);
}
