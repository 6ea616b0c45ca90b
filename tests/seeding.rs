use std::fs;
use std::path::Path;

use coin_mark::db::{
    count_coins, ensure_schema, fetch_coins, insert_coin, open_in_memory, CoinFilter,
};
use coin_mark::importer::{
    import_resource, preload, seed_if_empty, BundledResources, DirectoryResources, ImportError,
    ResourceError, SeedOutcome, REFERENCE_SETS,
};
use coin_mark::Coin;
use rusqlite::Connection;

fn write_resource(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(format!("{name}.json")), body).unwrap();
}

#[test]
fn empty_store_is_seeded_from_bundled_sets() {
    let conn = open_in_memory().unwrap();

    let outcome = seed_if_empty(&conn, &BundledResources);
    let report = match outcome {
        SeedOutcome::Seeded(report) => report,
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert!(report.committed);
    assert_eq!(report.failures().count(), 0);
    let names: Vec<&str> = report.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, REFERENCE_SETS);

    let stored = count_coins(&conn, CoinFilter::All, None).unwrap();
    assert_eq!(stored, report.inserted());
    assert!(stored > 0);
    assert_eq!(count_coins(&conn, CoinFilter::Collected, None).unwrap(), 0);
}

#[test]
fn populated_store_is_left_alone() {
    let conn = open_in_memory().unwrap();
    insert_coin(
        &conn,
        &Coin::new("Yellowstone", "America the Beautiful", 2010, Some("P".into())),
    )
    .unwrap();

    let outcome = seed_if_empty(&conn, &BundledResources);
    assert!(matches!(outcome, SeedOutcome::AlreadyPopulated));
    assert_eq!(count_coins(&conn, CoinFilter::All, None).unwrap(), 1);
}

#[test]
fn collected_flag_in_source_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "owned",
        r#"[{"name": "Sally Ride", "series": "American Women", "year": 2022, "mintMark": "D", "isCollected": true}]"#,
    );
    let conn = open_in_memory().unwrap();

    let inserted = import_resource(&conn, &DirectoryResources::new(dir.path()), "owned").unwrap();
    assert_eq!(inserted, 1);

    let coins = fetch_coins(&conn).unwrap();
    assert_eq!(coins.len(), 1);
    assert!(!coins[0].is_collected);
}

#[test]
fn malformed_and_missing_resources_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "broken",
        r#"[
            {"name": "Acadia", "series": "America the Beautiful", "year": 2012},
            {"series": "America the Beautiful", "year": 2012}
        ]"#,
    );
    write_resource(
        dir.path(),
        "good",
        r#"[
            {"name": "Denali", "series": "America the Beautiful", "year": 2012, "mintMark": "P"},
            {"name": "Denali", "series": "America the Beautiful", "year": 2012, "mintMark": ""}
        ]"#,
    );
    let source = DirectoryResources::new(dir.path());
    let conn = open_in_memory().unwrap();

    let report = preload(&conn, &source, &["broken", "absent", "good"]);

    assert!(report.committed);
    assert_eq!(report.inserted(), 2);
    assert!(matches!(
        report.resources[0].result,
        Err(ImportError::Decode { .. })
    ));
    assert!(matches!(
        report.resources[1].result,
        Err(ImportError::Resource(ResourceError::NotFound { .. }))
    ));
    assert_eq!(report.resources[2].result.as_ref().unwrap(), &2);

    let coins = fetch_coins(&conn).unwrap();
    assert_eq!(coins.len(), 2);
    assert!(coins.iter().all(|coin| coin.name == "Denali"));
    assert_eq!(
        coins.iter().filter(|coin| coin.mint_mark.is_none()).count(),
        1,
        "empty mint mark should be stored as NULL"
    );
}

#[test]
fn snapshot_sorts_by_series_then_year_then_name() {
    let conn = open_in_memory().unwrap();
    for (name, series, year) in [
        ("Y", "B", 2000),
        ("X", "B", 1999),
        ("Y", "A", 2000),
        ("X", "A", 2000),
        ("Y", "A", 1999),
        ("X", "B", 2000),
    ] {
        insert_coin(&conn, &Coin::new(name, series, year, None)).unwrap();
    }

    let order: Vec<(String, i64, String)> = fetch_coins(&conn)
        .unwrap()
        .into_iter()
        .map(|coin| (coin.series, coin.year, coin.name))
        .collect();

    let expected = [
        ("A", 1999, "Y"),
        ("A", 2000, "X"),
        ("A", 2000, "Y"),
        ("B", 1999, "X"),
        ("B", 2000, "X"),
        ("B", 2000, "Y"),
    ];
    let expected: Vec<(String, i64, String)> = expected
        .iter()
        .map(|(series, year, name)| (series.to_string(), *year, name.to_string()))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn seeded_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("coins.sqlite");

    let conn = ensure_schema(&db_path).unwrap();
    assert!(matches!(
        seed_if_empty(&conn, &BundledResources),
        SeedOutcome::Seeded(_)
    ));
    let first_count = count_coins(&conn, CoinFilter::All, None).unwrap();
    drop(conn);

    let conn = ensure_schema(&db_path).unwrap();
    assert!(matches!(
        seed_if_empty(&conn, &BundledResources),
        SeedOutcome::AlreadyPopulated
    ));
    assert_eq!(count_coins(&conn, CoinFilter::All, None).unwrap(), first_count);
}

#[test]
fn failed_emptiness_check_skips_the_import() {
    // No `coins` table, so the bounded count cannot run.
    let conn = Connection::open_in_memory().unwrap();

    match seed_if_empty(&conn, &BundledResources) {
        SeedOutcome::ProbeFailed(err) => {
            assert!(err.to_string().contains("failed to count coins"))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn rejected_insert_rolls_back_only_its_resource() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "rejected",
        r#"[
            {"name": "Homestead", "series": "America the Beautiful", "year": 2015},
            {"name": "Kisatchie", "series": "America the Beautiful", "year": 2015}
        ]"#,
    );
    write_resource(
        dir.path(),
        "accepted",
        r#"[{"name": "Saratoga", "series": "America the Beautiful", "year": 2015}]"#,
    );
    let conn = open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_kisatchie BEFORE INSERT ON coins
         WHEN NEW.name = 'Kisatchie'
         BEGIN SELECT RAISE(ABORT, 'kisatchie rejected'); END;",
    )
    .unwrap();

    let report = preload(
        &conn,
        &DirectoryResources::new(dir.path()),
        &["rejected", "accepted"],
    );

    assert!(report.committed);
    assert_eq!(report.inserted(), 1);
    match &report.resources[0].result {
        Err(err @ ImportError::Store { .. }) => {
            assert!(err.to_string().contains("kisatchie rejected"))
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let names: Vec<String> = fetch_coins(&conn)
        .unwrap()
        .into_iter()
        .map(|coin| coin.name)
        .collect();
    assert_eq!(names, ["Saratoga"]);
}

#[test]
fn failed_commit_leaves_the_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "parks",
        r#"[{"name": "Shenandoah", "series": "America the Beautiful", "year": 2014}]"#,
    );
    let conn = open_in_memory().unwrap();
    // A deferred foreign key is only checked at COMMIT, which then fails.
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         CREATE TABLE owners (id TEXT PRIMARY KEY);
         CREATE TABLE coin_owners (
             coin_id TEXT REFERENCES owners(id) DEFERRABLE INITIALLY DEFERRED
         );
         CREATE TRIGGER track_owner AFTER INSERT ON coins
         BEGIN INSERT INTO coin_owners (coin_id) VALUES (NEW.id); END;",
    )
    .unwrap();

    let report = preload(&conn, &DirectoryResources::new(dir.path()), &["parks"]);

    assert!(!report.committed);
    assert!(report.commit_error.is_some());
    assert_eq!(report.inserted(), 0);
    assert_eq!(report.resources[0].result.as_ref().unwrap(), &1);
    assert_eq!(count_coins(&conn, CoinFilter::All, None).unwrap(), 0);
}
