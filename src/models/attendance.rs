use super::{direction::Direction, scanner::ScannerKind};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// One immutable IN/OUT event. Rows are appended, never updated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: String,
    pub student_name: String,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>, // ⇔ attendance.timestamp (TEXT, RFC 3339)
    pub location: String,
    pub scanner: ScannerKind,
    pub recorded_by: String,
}

impl AttendanceRecord {
    /// Build a record not yet stored (`id = 0`).
    pub fn new(
        student_id: &str,
        student_name: &str,
        direction: Direction,
        timestamp: DateTime<Utc>,
        location: &str,
        scanner: ScannerKind,
        recorded_by: &str,
    ) -> Self {
        Self {
            id: 0,
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            direction,
            timestamp,
            location: location.to_string(),
            scanner,
            recorded_by: recorded_by.to_string(),
        }
    }

    pub fn local_time(&self) -> DateTime<Local> {
        self.timestamp.with_timezone(&Local)
    }

    pub fn date_str(&self) -> String {
        self.local_time().format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.local_time().format("%H:%M:%S").to_string()
    }
}
