use predicates::str::contains;

mod common;
use common::{init_db_with_student, rp, setup_test_db, temp_out};

#[test]
fn init_applies_migrations_once() {
    let db_path = setup_test_db("db_init_once");

    rp().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Migration applied"));

    rp().args(["--db", &db_path, "db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("0 applied"));
}

#[test]
fn check_reports_broken_alternation() {
    let db_path = init_db_with_student("db_check_alternation");

    rp().args(["--db", &db_path, "scan", "--id", "STD001"])
        .assert()
        .success();

    rp().args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Alternation check passed"));

    // a second IN written by another device
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO attendance (student_id, student_name, direction, timestamp, location, scanner, recorded_by)
         VALUES ('STD001', 'Ana Rossi', 'IN', '2099-01-01T08:00:00.000Z', 'School Bus', 'bus', 'Bus Driver')",
        [],
    )
    .unwrap();

    rp().args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("1 record(s) break the IN/OUT alternation"));
}

#[test]
fn info_log_and_backup() {
    let db_path = init_db_with_student("db_info_log");

    rp().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Students"));

    rp().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("student_add"));

    let out = temp_out("db_backup", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    std::fs::remove_file(&zip).ok();

    rp().args(["--db", &db_path, "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    assert!(std::path::Path::new(&zip).exists());
}
