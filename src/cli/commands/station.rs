use crate::cli::commands::{cooldown_window, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::MemoryScanCache;
use crate::core::resolver::{AttendanceResolver, ScanContext};
use crate::core::station::run_station;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use std::io;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Station {
        scanner,
        manual,
        cooldown,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let ctx = ScanContext::from_config(cfg, *scanner);
        let window = cooldown_window(cfg, *cooldown);

        header(format!("{} scanner at {}", ctx.scanner, ctx.location));
        info(format!(
            "{} one per line, 'quit' to stop (cooldown {}s)",
            if *manual { "Type student IDs" } else { "Scan QR codes" },
            window.num_seconds()
        ));

        let mut resolver = AttendanceResolver::new(&pool, MemoryScanCache::new(), ctx, window);
        let stats = run_station(io::stdin().lock(), &mut resolver, *manual)?;

        info(format!(
            "Session closed: {} accepted, {} recent, {} failed, {} other codes",
            stats.accepted, stats.rejected, stats.failed, stats.opaque
        ));
    }

    Ok(())
}
