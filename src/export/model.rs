// src/export/model.rs

use crate::models::attendance::AttendanceRecord;
use serde::Serialize;

/// Flat attendance row shared by the CSV and JSON writers.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AttendanceExport {
    pub id: i64,
    pub student_id: String,
    pub student_name: String,
    pub direction: String,
    pub date: String,
    pub time: String,
    pub timestamp: String,
    pub location: String,
    pub scanner: String,
    pub recorded_by: String,
}

impl From<&AttendanceRecord> for AttendanceExport {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id.clone(),
            student_name: r.student_name.clone(),
            direction: r.direction.to_db_str().to_string(),
            date: r.date_str(),
            time: r.time_str(),
            timestamp: r.timestamp.to_rfc3339(),
            location: r.location.clone(),
            scanner: r.scanner.to_db_str().to_string(),
            recorded_by: r.recorded_by.clone(),
        }
    }
}
