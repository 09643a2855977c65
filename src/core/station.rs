//! Interactive scanning station: one resolver, one session cache, one
//! input line per scan.

use crate::core::cache::ScanCache;
use crate::core::resolver::{AttendanceResolver, ScanDecision};
use crate::db::store::AttendanceStore;
use crate::errors::AppResult;
use crate::models::qr::ScanInput;
use crate::ui::messages::{error, info, success, warning};
use chrono::Utc;
use std::io::BufRead;

/// Counters printed when the session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub opaque: usize,
}

/// Print the outcome of one resolution the way every scanning surface does.
pub fn report_decision(decision: &ScanDecision) {
    match decision {
        ScanDecision::Accepted {
            record,
            notification,
        } => {
            success(format!(
                "{} ({}) marked {} at {} at {}",
                record.student_name,
                record.student_id,
                record.direction,
                record.location,
                record.time_str()
            ));
            info(format!(
                "Notification #{} for {}: {}",
                notification.id,
                if notification.parent_name.is_empty() {
                    "parent"
                } else {
                    notification.parent_name.as_str()
                },
                notification.message
            ));
        }
        ScanDecision::RecentScan {
            student_id,
            student_name,
            direction,
            elapsed,
        } => {
            warning(format!(
                "Recent scan: {} ({}) was already marked {} {}s ago",
                student_name,
                student_id,
                direction,
                elapsed.num_seconds().max(0)
            ));
        }
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "quit" | "exit" | "q")
}

/// Read scans from `reader` until EOF or `quit`.
///
/// Per-scan failures are reported and the loop goes on; only an I/O error
/// on the input itself ends the session with an error.
pub fn run_station<R, S, C>(
    reader: R,
    resolver: &mut AttendanceResolver<'_, S, C>,
    manual: bool,
) -> AppResult<StationStats>
where
    R: BufRead,
    S: AttendanceStore,
    C: ScanCache,
{
    let mut stats = StationStats::default();

    for line in reader.lines() {
        let line = line?;
        let raw = line.trim();

        if raw.is_empty() {
            continue;
        }
        if is_quit(raw) {
            break;
        }

        let id = match ScanInput::parse(raw, manual) {
            Ok(ScanInput::Student { id_number, .. }) => id_number,
            Ok(ScanInput::Opaque(data)) => {
                warning(format!("QR code scanned: {}", data));
                stats.opaque += 1;
                continue;
            }
            Err(e) => {
                error(e);
                stats.failed += 1;
                continue;
            }
        };

        match resolver.resolve(&id, Utc::now()) {
            Ok(decision) => {
                report_decision(&decision);
                match decision {
                    ScanDecision::Accepted { .. } => stats.accepted += 1,
                    ScanDecision::RecentScan { .. } => stats.rejected += 1,
                }
            }
            Err(e) if e.is_transient() => {
                warning(e);
                stats.failed += 1;
            }
            Err(e) => {
                error(e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
