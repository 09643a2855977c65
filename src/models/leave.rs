use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Disapproved,
}

impl LeaveStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Disapproved => "Disapproved",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(LeaveStatus::Pending),
            "Approved" => Some(LeaveStatus::Approved),
            "Disapproved" => Some(LeaveStatus::Disapproved),
            _ => None,
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveApplication {
    pub id: i64,
    pub student_name: String,
    pub student_class: String,
    pub roll: String,
    pub reason: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub status: LeaveStatus,
    pub created_at: String,
}
