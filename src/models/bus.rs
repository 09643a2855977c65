use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Bus {
    pub id: i64,
    pub name: String, // unique, used on the command line
    pub driver_name: String,
    pub driver_contact: String,
    pub created_at: String,
}

/// Departure of a bus on one day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BusSchedule {
    pub id: i64,
    pub bus_id: i64,
    pub bus_name: String,
    pub date: NaiveDate,
    pub time: String, // HH:MM
    pub info: String,
    pub updated_at: String,
}
