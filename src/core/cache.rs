//! Per-station memory of the last resolution for each student.

use crate::db::{ts_from_db, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

/// What a station last decided for a student, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMemo {
    pub direction: Direction,
    pub at: DateTime<Utc>,
}

pub trait ScanCache {
    fn last(&self, student_id: &str) -> AppResult<Option<ScanMemo>>;
    fn remember(&mut self, student_id: &str, memo: ScanMemo) -> AppResult<()>;
}

/// Session-scoped cache: lives as long as the station process.
#[derive(Debug, Default)]
pub struct MemoryScanCache {
    entries: HashMap<String, ScanMemo>,
}

impl MemoryScanCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanCache for MemoryScanCache {
    fn last(&self, student_id: &str) -> AppResult<Option<ScanMemo>> {
        Ok(self.entries.get(student_id).copied())
    }

    fn remember(&mut self, student_id: &str, memo: ScanMemo) -> AppResult<()> {
        self.entries.insert(student_id.to_string(), memo);
        Ok(())
    }
}

/// Cache persisted in `scan_memo`, keyed by station name.
///
/// One-shot `scan` invocations sharing a station name see each other's
/// resolutions. Stations with different names never do.
pub struct SqliteScanCache<'a> {
    conn: &'a Connection,
    station: String,
}

impl<'a> SqliteScanCache<'a> {
    pub fn new(conn: &'a Connection, station: &str) -> Self {
        Self {
            conn,
            station: station.to_string(),
        }
    }
}

impl ScanCache for SqliteScanCache<'_> {
    fn last(&self, student_id: &str) -> AppResult<Option<ScanMemo>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT direction, resolved_at FROM scan_memo
             WHERE station = ?1 AND student_id = ?2",
        )?;

        let row: Option<(String, String)> = stmt
            .query_row(params![self.station, student_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;

        match row {
            None => Ok(None),
            Some((dir, at)) => {
                let direction = Direction::from_db_str(&dir)
                    .ok_or_else(|| AppError::InvalidDirection(dir.clone()))?;
                Ok(Some(ScanMemo {
                    direction,
                    at: ts_from_db(&at)?,
                }))
            }
        }
    }

    fn remember(&mut self, student_id: &str, memo: ScanMemo) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO scan_memo (station, student_id, direction, resolved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(station, student_id)
             DO UPDATE SET direction = excluded.direction, resolved_at = excluded.resolved_at",
            params![
                self.station,
                student_id,
                memo.direction.to_db_str(),
                ts_to_db(&memo.at)
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use chrono::TimeZone;

    fn memo(direction: Direction, secs: i64) -> ScanMemo {
        ScanMemo {
            direction,
            at: Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn memory_cache_keeps_latest_entry() {
        let mut cache = MemoryScanCache::new();
        assert_eq!(cache.last("STD001").unwrap(), None);

        cache.remember("STD001", memo(Direction::In, 0)).unwrap();
        cache.remember("STD001", memo(Direction::Out, 30)).unwrap();

        assert_eq!(
            cache.last("STD001").unwrap(),
            Some(memo(Direction::Out, 30))
        );
        assert_eq!(cache.last("STD002").unwrap(), None);
    }

    #[test]
    fn sqlite_cache_is_scoped_by_station() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();

        let mut gate = SqliteScanCache::new(&conn, "gate");
        gate.remember("STD001", memo(Direction::In, 5)).unwrap();
        gate.remember("STD001", memo(Direction::Out, 50)).unwrap();

        let bus = SqliteScanCache::new(&conn, "bus-7");
        assert_eq!(bus.last("STD001").unwrap(), None);

        let gate_again = SqliteScanCache::new(&conn, "gate");
        assert_eq!(
            gate_again.last("STD001").unwrap(),
            Some(memo(Direction::Out, 50))
        );
    }
}
