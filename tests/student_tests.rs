use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_student, rp};

#[test]
fn show_prints_card_payload() {
    let db_path = init_db_with_student("student_show");

    rp().args(["--db", &db_path, "student", "show", "STD001"])
        .assert()
        .success()
        .stdout(contains("Marco Rossi"))
        .stdout(contains(r#""idNumber":"STD001""#));
}

#[test]
fn duplicate_id_is_refused() {
    let db_path = init_db_with_student("student_duplicate");

    rp().args([
        "--db",
        &db_path,
        "student",
        "add",
        "--id",
        "STD001",
        "--name",
        "Other",
        "--class",
        "1C",
        "--parent-name",
        "P",
        "--parent-contact",
        "1",
        "--parent-address",
        "A",
    ])
    .assert()
    .failure()
    .stderr(contains("already exists"));
}

#[test]
fn edit_then_list_by_class() {
    let db_path = init_db_with_student("student_edit");

    rp().args([
        "--db", &db_path, "student", "edit", "STD001", "--class", "4B",
    ])
    .assert()
    .success();

    rp().args(["--db", &db_path, "student", "list", "--class", "4B"])
        .assert()
        .success()
        .stdout(contains("Ana Rossi"));

    rp().args(["--db", &db_path, "student", "list", "--class", "3A"])
        .assert()
        .success()
        .stdout(contains("No students found").and(contains("Ana Rossi").not()));
}

#[test]
fn deleted_student_cannot_be_scanned() {
    let db_path = init_db_with_student("student_delete");

    rp().args(["--db", &db_path, "student", "del", "STD001"])
        .assert()
        .success();

    rp().args(["--db", &db_path, "scan", "--id", "STD001"])
        .assert()
        .failure()
        .stderr(contains("Student not found"));
}
