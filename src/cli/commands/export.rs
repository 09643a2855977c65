use crate::cli::parser::Commands;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        student,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        ExportLogic::export(&pool, *format, file, student.as_deref(), *force)?;
    }

    Ok(())
}
