use crate::cli::commands::{cooldown_window, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::SqliteScanCache;
use crate::core::resolver::{AttendanceResolver, ScanContext};
use crate::core::station::report_decision;
use crate::errors::AppResult;
use crate::models::qr::ScanInput;
use crate::ui::messages::warning;
use chrono::Utc;

/// One-shot scan. The duplicate window is shared with every other
/// invocation using the same station name.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan {
        scanner,
        qr,
        id,
        station,
        cooldown,
    } = cmd
    {
        let input = match (id, qr) {
            (Some(typed), _) => ScanInput::parse(typed, true)?,
            (None, Some(raw)) => ScanInput::parse(raw, false)?,
            (None, None) => ScanInput::parse("", true)?,
        };

        let student_id = match input {
            ScanInput::Student { id_number, .. } => id_number,
            ScanInput::Opaque(data) => {
                warning(format!("QR code scanned: {}", data));
                return Ok(());
            }
        };

        let pool = open_pool(cfg)?;
        let station = station.as_deref().unwrap_or(cfg.station.as_str());

        let mut resolver = AttendanceResolver::new(
            &pool,
            SqliteScanCache::new(&pool.conn, station),
            ScanContext::from_config(cfg, *scanner),
            cooldown_window(cfg, *cooldown),
        );

        let decision = resolver.resolve(&student_id, Utc::now())?;
        report_decision(&decision);
    }

    Ok(())
}
