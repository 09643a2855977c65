#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rp() -> Command {
    cargo_bin_cmd!("rpickup")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpickup.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    rp().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn add_student(db_path: &str, id: &str, name: &str, parent_email: &str) {
    rp().args([
        "--db",
        db_path,
        "student",
        "add",
        "--id",
        id,
        "--name",
        name,
        "--class",
        "3A",
        "--parent-name",
        "Marco Rossi",
        "--parent-contact",
        "+39 333 000111",
        "--parent-email",
        parent_email,
        "--parent-address",
        "Via Roma 1",
    ])
    .assert()
    .success();
}

/// Fresh database holding STD001 (Ana Rossi, parent marco@example.org)
pub fn init_db_with_student(name: &str) -> String {
    let db_path = setup_test_db(name);
    init_db(&db_path);
    add_student(&db_path, "STD001", "Ana Rossi", "marco@example.org");
    db_path
}

pub fn count_rows(db_path: &str, table: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}

pub fn directions(db_path: &str, student: &str) -> Vec<String> {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    let mut stmt = conn
        .prepare("SELECT direction FROM attendance WHERE student_id = ?1 ORDER BY id")
        .expect("prepare");
    stmt.query_map([student], |row| row.get(0))
        .expect("query")
        .map(|r| r.expect("row"))
        .collect()
}
