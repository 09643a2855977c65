//! Attendance resolver: turns a scanned student ID into an IN or OUT event.
//!
//! The next direction is the opposite of the student's most recent record
//! (IN when there is none). A scan that merely repeats the event this
//! station just recorded, within the cooldown window, is rejected without
//! writing anything.

use crate::config::Config;
use crate::core::cache::{ScanCache, ScanMemo};
use crate::core::notify::build_notification;
use crate::db::store::AttendanceStore;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::direction::Direction;
use crate::models::notification::NotificationRecord;
use crate::models::scanner::ScannerKind;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Static description of the checkpoint a station stands at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanContext {
    pub scanner: ScannerKind,
    pub location: String,
    pub recorded_by: String,
}

impl ScanContext {
    pub fn from_config(cfg: &Config, scanner: ScannerKind) -> Self {
        let (location, recorded_by) = cfg.scanner_context(scanner);
        Self {
            scanner,
            location: location.to_string(),
            recorded_by: recorded_by.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// Both documents were written.
    Accepted {
        record: AttendanceRecord,
        notification: NotificationRecord,
    },
    /// Repeat of the event this station resolved `elapsed` ago.
    RecentScan {
        student_id: String,
        student_name: String,
        direction: Direction,
        elapsed: Duration,
    },
}

/// Sort newest first and return the direction the next event must take.
pub fn next_direction(records: &mut [AttendanceRecord]) -> Direction {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    records
        .first()
        .map(|latest| latest.direction.opposite())
        .unwrap_or(Direction::In)
}

pub struct AttendanceResolver<'a, S: AttendanceStore, C: ScanCache> {
    store: &'a S,
    cache: C,
    ctx: ScanContext,
    cooldown: Duration,
}

impl<'a, S: AttendanceStore, C: ScanCache> AttendanceResolver<'a, S, C> {
    pub fn new(store: &'a S, cache: C, ctx: ScanContext, cooldown: Duration) -> Self {
        Self {
            store,
            cache,
            ctx,
            cooldown,
        }
    }

    pub fn context(&self) -> &ScanContext {
        &self.ctx
    }

    /// Resolve one scan of `student_id` happening at `now`.
    ///
    /// Errors: [`AppError::StudentNotFound`] for unknown IDs and
    /// [`AppError::StoreUnavailable`] when the store cannot be reached. In
    /// both cases nothing is written.
    pub fn resolve(&mut self, student_id: &str, now: DateTime<Utc>) -> AppResult<ScanDecision> {
        let student_id = student_id.trim();

        let student = self
            .store
            .find_student(student_id)?
            .ok_or_else(|| AppError::StudentNotFound(student_id.to_string()))?;

        let mut records = self.store.records_for_student(student_id)?;
        let direction = next_direction(&mut records);

        if let (Some(latest), Some(memo)) = (records.first(), self.cache.last(student_id)?) {
            let elapsed = now.signed_duration_since(memo.at);

            if memo.direction == latest.direction && elapsed < self.cooldown {
                warn!(
                    student = student_id,
                    direction = %memo.direction,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "recent scan rejected"
                );
                return Ok(ScanDecision::RecentScan {
                    student_id: student.id_number,
                    student_name: student.name,
                    direction: memo.direction,
                    elapsed,
                });
            }
        }

        let mut record = AttendanceRecord::new(
            &student.id_number,
            &student.name,
            direction,
            now,
            &self.ctx.location,
            self.ctx.scanner,
            &self.ctx.recorded_by,
        );
        record.id = self.store.append_record(&record)?;

        let mut notification = build_notification(&student, &record);
        notification.id = self.store.append_notification(&notification)?;

        self.cache.remember(student_id, ScanMemo { direction, at: now })?;

        debug!(
            student = student_id,
            %direction,
            scanner = %self.ctx.scanner,
            previous = records.len(),
            "scan accepted"
        );

        Ok(ScanDecision::Accepted {
            record,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryScanCache;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use crate::db::students::insert_student;
    use crate::models::student::Student;
    use chrono::TimeZone;
    use std::cell::RefCell;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
    }

    fn ctx() -> ScanContext {
        ScanContext {
            scanner: ScannerKind::School,
            location: "School Main Gate".into(),
            recorded_by: "School Authority".into(),
        }
    }

    fn student(id: &str) -> Student {
        Student {
            id: 0,
            id_number: id.into(),
            name: "Ana Rossi".into(),
            class: "3A".into(),
            parent_name: "Marco Rossi".into(),
            parent_contact: "+39 333 000111".into(),
            parent_email: "marco@example.org".into(),
            parent_address: "Via Roma 1".into(),
            photo: None,
            qr_value: None,
            bus_id: None,
            created_at: "2025-09-01T08:00:00+02:00".into(),
        }
    }

    fn pool_with(ids: &[&str]) -> DbPool {
        let pool = DbPool::open_in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        for id in ids {
            insert_student(&pool.conn, &student(id)).unwrap();
        }
        pool
    }

    fn count(pool: &DbPool, table: &str) -> i64 {
        pool.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    fn accepted_direction(d: ScanDecision) -> Direction {
        match d {
            ScanDecision::Accepted { record, .. } => record.direction,
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn first_scan_is_in() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        assert_eq!(accepted_direction(r.resolve("STD001", at(0)).unwrap()), Direction::In);
        assert_eq!(count(&pool, "attendance"), 1);
        assert_eq!(count(&pool, "notifications"), 1);
    }

    #[test]
    fn direction_alternates_after_cooldown() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        let dirs: Vec<Direction> = [0, 60, 120, 180]
            .iter()
            .map(|s| accepted_direction(r.resolve("STD001", at(*s)).unwrap()))
            .collect();

        assert_eq!(
            dirs,
            vec![Direction::In, Direction::Out, Direction::In, Direction::Out]
        );
    }

    #[test]
    fn repeat_within_cooldown_is_rejected_without_writes() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        r.resolve("STD001", at(0)).unwrap();
        let second = r.resolve("STD001", at(3)).unwrap();

        match second {
            ScanDecision::RecentScan {
                student_id,
                direction,
                elapsed,
                ..
            } => {
                assert_eq!(student_id, "STD001");
                assert_eq!(direction, Direction::In);
                assert_eq!(elapsed, Duration::seconds(3));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(count(&pool, "attendance"), 1);
        assert_eq!(count(&pool, "notifications"), 1);
    }

    #[test]
    fn cooldown_boundary_accepts() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        r.resolve("STD001", at(0)).unwrap();
        assert_eq!(
            accepted_direction(r.resolve("STD001", at(10)).unwrap()),
            Direction::Out
        );
    }

    #[test]
    fn other_students_are_not_suppressed() {
        let pool = pool_with(&["STD001", "STD002"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        r.resolve("STD001", at(0)).unwrap();
        assert_eq!(
            accepted_direction(r.resolve("STD002", at(1)).unwrap()),
            Direction::In
        );
    }

    #[test]
    fn unknown_student_is_not_found_and_writes_nothing() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        let err = r.resolve("STD999", at(0)).unwrap_err();
        assert!(matches!(err, AppError::StudentNotFound(id) if id == "STD999"));
        assert_eq!(count(&pool, "attendance"), 0);
        assert_eq!(count(&pool, "notifications"), 0);
    }

    #[test]
    fn record_from_another_station_is_not_a_duplicate() {
        let pool = pool_with(&["STD001"]);

        let mut bus = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );
        let mut gate = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        bus.resolve("STD001", at(0)).unwrap();
        // the gate knows nothing of the bus scan and flips the direction
        assert_eq!(
            accepted_direction(gate.resolve("STD001", at(2)).unwrap()),
            Direction::Out
        );
        // the bus last resolved IN, but the latest record is now OUT
        assert_eq!(
            accepted_direction(bus.resolve("STD001", at(4)).unwrap()),
            Direction::In
        );
    }

    #[test]
    fn stored_order_does_not_matter() {
        let mut records = vec![
            AttendanceRecord::new("S", "S", Direction::In, at(0), "x", ScannerKind::Bus, "d"),
            AttendanceRecord::new("S", "S", Direction::In, at(200), "x", ScannerKind::Bus, "d"),
            AttendanceRecord::new("S", "S", Direction::Out, at(100), "x", ScannerKind::Bus, "d"),
        ];
        assert_eq!(next_direction(&mut records), Direction::Out);
        assert_eq!(records[0].timestamp, at(200));
        assert_eq!(next_direction(&mut []), Direction::In);
    }

    #[test]
    fn notification_references_parent_contact() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        match r.resolve("STD001", at(0)).unwrap() {
            ScanDecision::Accepted { notification, .. } => {
                assert!(notification.id > 0);
                assert_eq!(notification.student_id, "STD001");
                assert_eq!(notification.parent_contact, "+39 333 000111");
                assert_eq!(notification.parent_email, "marco@example.org");
                assert_eq!(notification.kind, "school");
                assert!(notification.message.contains("marked IN at School Main Gate"));
                assert!(!notification.read);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn notification_carries_the_event_instant() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        match r.resolve("STD001", at(0)).unwrap() {
            ScanDecision::Accepted {
                record,
                notification,
            } => {
                let created = DateTime::parse_from_rfc3339(&notification.created_at)
                    .unwrap()
                    .with_timezone(&Utc);
                assert_eq!(created, record.timestamp);
                assert_eq!(created, at(0));
                assert!(notification.created_at.ends_with('Z'));
                assert_eq!(notification.direction, Some(Direction::In));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    /// Store whose reads fail as an unreachable backend would.
    struct OfflineStore {
        writes: RefCell<usize>,
    }

    impl AttendanceStore for OfflineStore {
        fn find_student(&self, _id: &str) -> AppResult<Option<Student>> {
            Err(AppError::StoreUnavailable("network is down".into()))
        }
        fn records_for_student(&self, _id: &str) -> AppResult<Vec<AttendanceRecord>> {
            Err(AppError::StoreUnavailable("network is down".into()))
        }
        fn append_record(&self, _r: &AttendanceRecord) -> AppResult<i64> {
            *self.writes.borrow_mut() += 1;
            Ok(1)
        }
        fn append_notification(&self, _n: &NotificationRecord) -> AppResult<i64> {
            *self.writes.borrow_mut() += 1;
            Ok(1)
        }
    }

    #[test]
    fn unreachable_store_is_transient() {
        let store = OfflineStore {
            writes: RefCell::new(0),
        };
        let mut r = AttendanceResolver::new(
            &store,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        let err = r.resolve("STD001", at(0)).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(*store.writes.borrow(), 0);
    }

    #[test]
    fn concrete_scenario_std001() {
        let pool = pool_with(&["STD001"]);
        let mut r = AttendanceResolver::new(
            &pool,
            MemoryScanCache::new(),
            ctx(),
            Duration::seconds(10),
        );

        assert_eq!(accepted_direction(r.resolve("STD001", at(0)).unwrap()), Direction::In);
        assert!(matches!(
            r.resolve("STD001", at(1)).unwrap(),
            ScanDecision::RecentScan { .. }
        ));

        match r.resolve("STD001", at(15)).unwrap() {
            ScanDecision::Accepted {
                record,
                notification,
            } => {
                assert_eq!(record.direction, Direction::Out);
                assert_eq!(notification.student_id, "STD001");
                assert_eq!(notification.parent_contact, "+39 333 000111");
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert_eq!(count(&pool, "attendance"), 2);
        assert_eq!(count(&pool, "notifications"), 2);
    }
}
