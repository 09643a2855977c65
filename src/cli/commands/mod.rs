pub mod backup;
pub mod bus;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod leave;
pub mod list;
pub mod log;
pub mod notify;
pub mod scan;
pub mod schedule;
pub mod station;
pub mod student;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database with the schema up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Cooldown window from the CLI override or the configuration.
pub(crate) fn cooldown_window(cfg: &Config, overridden: Option<u64>) -> chrono::Duration {
    // one day is already far past any sensible window
    let secs = overridden.unwrap_or(cfg.cooldown_seconds).min(86_400);
    chrono::Duration::seconds(secs as i64)
}
