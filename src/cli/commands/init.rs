use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = cfg.init_all(cli.test)?;
    let db_str = db_path.to_string_lossy();

    println!("⚙️  Initializing rPickup…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_str);

    let pool = DbPool::new(&db_str)?;
    init_db(&pool.conn)?;

    ttlog_soft(
        &pool.conn,
        "init",
        &db_str,
        &format!("Database initialized at {}", db_str),
    );

    success(format!("Database initialized at {}", db_str));
    Ok(())
}
