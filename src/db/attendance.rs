use super::{conversion_error, ts_from_db, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::direction::Direction;
use crate::models::scanner::ScannerKind;
use rusqlite::{Connection, Result, Row, ToSql, params};

pub fn map_row(row: &Row) -> Result<AttendanceRecord> {
    let dir_str: String = row.get("direction")?;
    let direction = Direction::from_db_str(&dir_str)
        .ok_or_else(|| conversion_error(AppError::InvalidDirection(dir_str.clone())))?;

    let scanner_str: String = row.get("scanner")?;
    let scanner = ScannerKind::from_db_str(&scanner_str)
        .ok_or_else(|| conversion_error(AppError::InvalidScanner(scanner_str.clone())))?;

    let ts_str: String = row.get("timestamp")?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        student_name: row.get("student_name")?,
        direction,
        timestamp: ts_from_db(&ts_str)?,
        location: row.get("location")?,
        scanner,
        recorded_by: row.get("recorded_by")?,
    })
}

/// Append one record. Returns the new row id.
pub fn insert_record(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO attendance (student_id, student_name, direction, timestamp,
                                 location, scanner, recorded_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        rec.student_id,
        rec.student_name,
        rec.direction.to_db_str(),
        ts_to_db(&rec.timestamp),
        rec.location,
        rec.scanner.to_db_str(),
        rec.recorded_by,
    ])?;
    Ok(conn.last_insert_rowid())
}

/// Every record of one student, in storage order. Callers sort.
pub fn load_records_for_student(
    conn: &Connection,
    student_id: &str,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM attendance WHERE student_id = ?1")?;

    let mut out = Vec::new();
    for r in stmt.query_map([student_id], map_row)? {
        out.push(r?);
    }
    Ok(out)
}

/// Records matching the optional student / scanner filters, newest first.
pub fn load_records(
    conn: &Connection,
    student_id: Option<&str>,
    scanner: Option<ScannerKind>,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut sql = String::from("SELECT * FROM attendance WHERE 1 = 1");
    let mut args: Vec<&dyn ToSql> = Vec::new();

    let scanner_code = scanner.map(|s| s.to_db_str());

    if let Some(sid) = &student_id {
        sql.push_str(" AND student_id = ?");
        args.push(sid);
    }
    if let Some(code) = &scanner_code {
        sql.push_str(" AND scanner = ?");
        args.push(code);
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }

    // timestamps are compared parsed, not as text
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    Ok(out)
}

/// Student ids that have at least one record.
pub fn distinct_students(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT student_id FROM attendance ORDER BY student_id")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
