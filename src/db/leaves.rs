use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::leave::{LeaveApplication, LeaveStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(s.to_string())))
}

pub fn map_row(row: &Row) -> Result<LeaveApplication> {
    let from_str: String = row.get("from_date")?;
    let to_str: String = row.get("to_date")?;
    let status_str: String = row.get("status")?;
    let status = LeaveStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidLeaveStatus(status_str.clone())))?;

    Ok(LeaveApplication {
        id: row.get("id")?,
        student_name: row.get("student_name")?,
        student_class: row.get("student_class")?,
        roll: row.get("roll")?,
        reason: row.get("reason")?,
        from_date: parse_date(&from_str)?,
        to_date: parse_date(&to_str)?,
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_leave(conn: &Connection, l: &LeaveApplication) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO leave_applications (student_name, student_class, roll, reason,
                                         from_date, to_date, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            l.student_name,
            l.student_class,
            l.roll,
            l.reason,
            l.from_date.format("%Y-%m-%d").to_string(),
            l.to_date.format("%Y-%m-%d").to_string(),
            l.status.to_db_str(),
            l.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_leave(conn: &Connection, id: i64) -> AppResult<Option<LeaveApplication>> {
    let mut stmt = conn.prepare("SELECT * FROM leave_applications WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// All applications in submission order; `pending_only` keeps `Pending` ones.
pub fn load_leaves(conn: &Connection, pending_only: bool) -> AppResult<Vec<LeaveApplication>> {
    let sql = if pending_only {
        "SELECT * FROM leave_applications WHERE status = 'Pending' ORDER BY id ASC"
    } else {
        "SELECT * FROM leave_applications ORDER BY id ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let mut out = Vec::new();
    for r in stmt.query_map([], map_row)? {
        out.push(r?);
    }
    Ok(out)
}

/// Most recent application submitted for a roll number.
pub fn latest_by_roll(conn: &Connection, roll: &str) -> AppResult<Option<LeaveApplication>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM leave_applications WHERE roll = ?1 ORDER BY id DESC LIMIT 1",
    )?;
    Ok(stmt.query_row([roll], map_row).optional()?)
}

pub fn set_status(conn: &Connection, id: i64, status: LeaveStatus) -> AppResult<()> {
    conn.execute(
        "UPDATE leave_applications SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    Ok(())
}
