use crate::db::notifications::{
    load_all, load_by_parent, load_by_student, mark_all_read, mark_read,
};
use crate::db::pool::DbPool;
use crate::db::ts_to_db;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::notification::NotificationRecord;
use crate::models::student::Student;

/// Message persisted for the parent when `record` is accepted.
pub fn build_notification(student: &Student, record: &AttendanceRecord) -> NotificationRecord {
    let message = format!(
        "{} has been marked {} at {} at {}",
        student.name,
        record.direction,
        record.location,
        record.time_str()
    );

    NotificationRecord {
        id: 0,
        student_id: student.id_number.clone(),
        student_name: student.name.clone(),
        parent_name: student.parent_name.clone(),
        parent_email: student.parent_email.clone(),
        parent_contact: student.parent_contact.clone(),
        message,
        kind: record.scanner.code().to_string(),
        direction: Some(record.direction),
        location: record.location.clone(),
        status: "sent".to_string(),
        read: false,
        created_at: ts_to_db(&record.timestamp),
    }
}

/// Who a notification query is for.
pub enum Recipient<'a> {
    Parent(&'a str),
    Student(&'a str),
    /// Admin view: every notification.
    Everyone,
}

pub struct NotifyLogic;

impl NotifyLogic {
    pub fn list(
        pool: &DbPool,
        who: Recipient<'_>,
        unread_only: bool,
    ) -> AppResult<Vec<NotificationRecord>> {
        let mut out = match who {
            Recipient::Parent(email) => load_by_parent(&pool.conn, email)?,
            Recipient::Student(id) => load_by_student(&pool.conn, id)?,
            Recipient::Everyone => load_all(&pool.conn)?,
        };
        if unread_only {
            out.retain(|n| !n.read);
        }
        Ok(out)
    }

    pub fn mark_read(pool: &DbPool, id: i64) -> AppResult<()> {
        mark_read(&pool.conn, id)
    }

    pub fn mark_all_read(pool: &DbPool, parent_email: &str) -> AppResult<usize> {
        mark_all_read(&pool.conn, parent_email)
    }
}
