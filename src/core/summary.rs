//! Per-day view of attendance: one row per (student, date) with the IN
//! and OUT times.

use crate::models::attendance::AttendanceRecord;
use crate::models::direction::Direction;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub student_id: String,
    pub student_name: String,
    pub in_at: Option<DateTime<Utc>>,
    pub out_at: Option<DateTime<Utc>>,
}

impl DailyEntry {
    pub fn status(&self) -> &'static str {
        match (self.in_at, self.out_at) {
            (Some(_), Some(_)) => "IN/OUT",
            (Some(_), None) => "IN",
            (None, Some(_)) => "OUT",
            (None, None) => "N/A",
        }
    }
}

/// Group records by local date and student. When a day holds several
/// events of the same direction, the latest one is shown.
pub fn summarize(records: &[AttendanceRecord]) -> Vec<DailyEntry> {
    let mut map: BTreeMap<(NaiveDate, String), DailyEntry> = BTreeMap::new();

    for rec in records {
        let date = rec.local_time().date_naive();
        let entry = map
            .entry((date, rec.student_id.clone()))
            .or_insert_with(|| DailyEntry {
                date,
                student_id: rec.student_id.clone(),
                student_name: rec.student_name.clone(),
                in_at: None,
                out_at: None,
            });

        let slot = match rec.direction {
            Direction::In => &mut entry.in_at,
            Direction::Out => &mut entry.out_at,
        };
        if slot.is_none_or(|t| rec.timestamp > t) {
            *slot = Some(rec.timestamp);
        }
    }

    // newest day first, students in id order inside a day
    let mut out: Vec<DailyEntry> = map.into_values().collect();
    out.sort_by(|a, b| b.date.cmp(&a.date).then(a.student_id.cmp(&b.student_id)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scanner::ScannerKind;
    use chrono::{Local, TimeZone};

    fn rec(student: &str, dir: Direction, ts: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord::new(student, student, dir, ts, "School Bus", ScannerKind::Bus, "Bus Driver")
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn groups_by_student_and_day() {
        let records = vec![
            rec("STD001", Direction::In, local(2025, 10, 1, 8)),
            rec("STD001", Direction::Out, local(2025, 10, 1, 14)),
            rec("STD002", Direction::In, local(2025, 10, 1, 8)),
            rec("STD001", Direction::In, local(2025, 10, 2, 8)),
        ];

        let days = summarize(&records);
        assert_eq!(days.len(), 3);

        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
        assert_eq!(days[0].status(), "IN");

        assert_eq!(days[1].student_id, "STD001");
        assert_eq!(days[1].status(), "IN/OUT");
        assert_eq!(days[2].student_id, "STD002");
        assert_eq!(days[2].status(), "IN");
    }

    #[test]
    fn latest_event_of_a_direction_wins() {
        let records = vec![
            rec("STD001", Direction::Out, local(2025, 10, 1, 15)),
            rec("STD001", Direction::Out, local(2025, 10, 1, 13)),
        ];
        let days = summarize(&records);
        assert_eq!(days[0].out_at, Some(local(2025, 10, 1, 15)));
        assert_eq!(days[0].status(), "OUT");
    }
}
