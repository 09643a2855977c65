use predicates::str::contains;

mod common;
use common::{init_db, rp, setup_test_db};

fn submit(db_path: &str, roll: &str, from: &str, to: &str) -> assert_cmd::assert::Assert {
    rp().args([
        "--db", db_path, "leave", "add", "--name", "Ana Rossi", "--class", "3A", "--roll", roll,
        "--reason", "Family trip", "--from", from, "--to", to,
    ])
    .assert()
}

#[test]
fn leave_lifecycle() {
    let db_path = setup_test_db("leave_lifecycle");
    init_db(&db_path);

    submit(&db_path, "12", "2025-10-01", "2025-10-03")
        .success()
        .stdout(contains("Leave #1 submitted"));

    rp().args(["--db", &db_path, "leave", "list", "--pending"])
        .assert()
        .success()
        .stdout(contains("Family trip"));

    rp().args(["--db", &db_path, "leave", "approve", "1"])
        .assert()
        .success()
        .stdout(contains("approved"));

    rp().args(["--db", &db_path, "leave", "reject", "1"])
        .assert()
        .failure()
        .stderr(contains("already Approved"));

    rp().args(["--db", &db_path, "leave", "status", "12"])
        .assert()
        .success()
        .stdout(contains("Approved"));
}

#[test]
fn reversed_range_and_bad_dates_fail() {
    let db_path = setup_test_db("leave_invalid");
    init_db(&db_path);

    submit(&db_path, "12", "2025-10-03", "2025-10-01")
        .failure()
        .stderr(contains("Invalid leave range"));

    submit(&db_path, "12", "03/10/2025", "2025-10-04")
        .failure()
        .stderr(contains("Invalid date format"));
}
