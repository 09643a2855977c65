//! The event store seen by the attendance resolver.

use crate::db::pool::DbPool;
use crate::db::{attendance, notifications, students};
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::notification::NotificationRecord;
use crate::models::student::Student;

/// Narrow interface over the append-only event store.
///
/// Nothing ties the calls together: no transaction spans a lookup and the
/// writes that follow it.
pub trait AttendanceStore {
    fn find_student(&self, id_number: &str) -> AppResult<Option<Student>>;

    /// Every record of the student, in no particular order.
    fn records_for_student(&self, id_number: &str) -> AppResult<Vec<AttendanceRecord>>;

    fn append_record(&self, record: &AttendanceRecord) -> AppResult<i64>;

    fn append_notification(&self, notification: &NotificationRecord) -> AppResult<i64>;
}

impl AttendanceStore for DbPool {
    fn find_student(&self, id_number: &str) -> AppResult<Option<Student>> {
        students::find_student(&self.conn, id_number)
    }

    fn records_for_student(&self, id_number: &str) -> AppResult<Vec<AttendanceRecord>> {
        attendance::load_records_for_student(&self.conn, id_number)
    }

    fn append_record(&self, record: &AttendanceRecord) -> AppResult<i64> {
        attendance::insert_record(&self.conn, record)
    }

    fn append_notification(&self, notification: &NotificationRecord) -> AppResult<i64> {
        notifications::insert_notification(&self.conn, notification)
    }
}
