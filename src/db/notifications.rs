use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use crate::models::notification::NotificationRecord;
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<NotificationRecord> {
    let direction = match row.get::<_, Option<String>>("direction")? {
        None => None,
        Some(d) => Some(
            Direction::from_db_str(&d)
                .ok_or_else(|| conversion_error(AppError::InvalidDirection(d.clone())))?,
        ),
    };

    Ok(NotificationRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        student_name: row.get("student_name")?,
        parent_name: row.get("parent_name")?,
        parent_email: row.get("parent_email")?,
        parent_contact: row.get("parent_contact")?,
        message: row.get("message")?,
        kind: row.get("kind")?,
        direction,
        location: row.get("location")?,
        status: row.get("status")?,
        read: row.get::<_, i32>("is_read")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_notification(conn: &Connection, n: &NotificationRecord) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO notifications (student_id, student_name, parent_name, parent_email,
                                    parent_contact, message, kind, direction, location,
                                    status, is_read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )?;
    stmt.execute(params![
        n.student_id,
        n.student_name,
        n.parent_name,
        n.parent_email,
        n.parent_contact,
        n.message,
        n.kind,
        n.direction.map(|d| d.to_db_str()),
        n.location,
        n.status,
        if n.read { 1 } else { 0 },
        n.created_at,
    ])?;
    Ok(conn.last_insert_rowid())
}

fn collect(conn: &Connection, sql: &str, key: &str) -> AppResult<Vec<NotificationRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let mut out = Vec::new();
    for r in stmt.query_map([key], map_row)? {
        out.push(r?);
    }
    Ok(out)
}

/// Notifications addressed to a parent email, newest first.
pub fn load_by_parent(
    conn: &Connection,
    parent_email: &str,
) -> AppResult<Vec<NotificationRecord>> {
    collect(
        conn,
        "SELECT * FROM notifications WHERE parent_email = ?1 ORDER BY created_at DESC, id DESC",
        parent_email,
    )
}

/// Notifications about one student, newest first.
pub fn load_by_student(
    conn: &Connection,
    student_id: &str,
) -> AppResult<Vec<NotificationRecord>> {
    collect(
        conn,
        "SELECT * FROM notifications WHERE student_id = ?1 ORDER BY created_at DESC, id DESC",
        student_id,
    )
}

/// Every notification, newest first.
pub fn load_all(conn: &Connection) -> AppResult<Vec<NotificationRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM notifications ORDER BY created_at DESC, id DESC")?;
    let mut out = Vec::new();
    for r in stmt.query_map([], map_row)? {
        out.push(r?);
    }
    Ok(out)
}

pub fn mark_read(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("UPDATE notifications SET is_read = 1 WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotificationNotFound(id));
    }
    Ok(())
}

/// Returns how many notifications changed state.
pub fn mark_all_read(conn: &Connection, parent_email: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE parent_email = ?1 AND is_read = 0",
        [parent_email],
    )?)
}
