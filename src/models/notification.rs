use super::direction::Direction;
use serde::Serialize;

/// Message stored for the parent-facing view. Delivery happens elsewhere.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: i64,
    pub student_id: String,
    pub student_name: String,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_contact: String,
    pub message: String,
    pub kind: String, // "bus" | "school" | "schedule"
    /// Set for attendance notifications only.
    pub direction: Option<Direction>,
    pub location: String,
    pub status: String,
    pub read: bool,
    pub created_at: String,
}
