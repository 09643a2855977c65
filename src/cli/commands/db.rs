use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit::AuditLogic;
use crate::db::initialize::init_db;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let n = run_pending_migrations(&pool.conn)?;
            println!("{}✔ Migration completed ({} applied).{}\n", GREEN, n, RESET);
        } else {
            init_db(&pool.conn)?;
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }

            println!("{}▶ Checking IN/OUT alternation…{}", CYAN, RESET);
            let violations = AuditLogic::check_alternation(&pool)?;

            if violations.is_empty() {
                println!("{}✔ Alternation check passed.{}\n", GREEN, RESET);
            } else {
                println!(
                    "{}✘ {} record(s) break the IN/OUT alternation:{}",
                    YELLOW,
                    violations.len(),
                    RESET
                );
                for v in &violations {
                    println!(
                        "  #{:<5} {} {} {} {} (previous: {})",
                        v.record.id,
                        v.record.student_id,
                        v.record.date_str(),
                        v.record.time_str(),
                        v.record.direction,
                        v.previous
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "none".to_string())
                    );
                }
                println!();
            }
        }

        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
