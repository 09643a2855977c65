//! Read-only check of the IN, OUT, IN, ... alternation per student.
//!
//! Nothing enforces the alternation at write time, so concurrent stations
//! can break it. This only reports; it never repairs.

use crate::db::attendance::{distinct_students, load_records_for_student};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::direction::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub record: AttendanceRecord,
    /// Direction of the record before it; `None` for the first one.
    pub previous: Option<Direction>,
}

/// Violations in one student's history, oldest first.
pub fn check_sequence(mut records: Vec<AttendanceRecord>) -> Vec<Violation> {
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

    let mut out = Vec::new();
    let mut expected = Direction::In;
    let mut previous = None;

    for rec in records {
        if rec.direction != expected {
            out.push(Violation {
                record: rec.clone(),
                previous,
            });
        }
        // resync on whatever was actually stored
        expected = rec.direction.opposite();
        previous = Some(rec.direction);
    }

    out
}

pub struct AuditLogic;

impl AuditLogic {
    pub fn check_alternation(pool: &DbPool) -> AppResult<Vec<Violation>> {
        let mut out = Vec::new();
        for sid in distinct_students(&pool.conn)? {
            let records = load_records_for_student(&pool.conn, &sid)?;
            out.extend(check_sequence(records));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scanner::ScannerKind;
    use chrono::{TimeZone, Utc};

    fn rec(id: i64, dir: Direction, secs: i64) -> AttendanceRecord {
        let mut r = AttendanceRecord::new(
            "STD001",
            "Ana",
            dir,
            Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap(),
            "School Main Gate",
            ScannerKind::School,
            "School Authority",
        );
        r.id = id;
        r
    }

    #[test]
    fn clean_history_has_no_violations() {
        let v = check_sequence(vec![
            rec(2, Direction::Out, 60),
            rec(1, Direction::In, 0),
            rec(3, Direction::In, 120),
        ]);
        assert!(v.is_empty());
    }

    #[test]
    fn double_in_and_leading_out_are_reported() {
        let v = check_sequence(vec![
            rec(1, Direction::Out, 0),
            rec(2, Direction::In, 10),
            rec(3, Direction::In, 12),
        ]);

        assert_eq!(v.len(), 2);
        assert_eq!(v[0].record.id, 1);
        assert_eq!(v[0].previous, None);
        assert_eq!(v[1].record.id, 3);
        assert_eq!(v[1].previous, Some(Direction::In));
    }
}
