use crate::cli::commands::open_pool;
use crate::cli::parser::ScheduleAction;
use crate::config::Config;
use crate::core::bus::ScheduleLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::parse_date;
use crate::utils::table::Table;
use chrono::Utc;

pub fn handle(action: &ScheduleAction, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    match action {
        ScheduleAction::Add {
            bus,
            date,
            time,
            info: details,
        } => {
            let s = ScheduleLogic::add(&pool, bus, parse_date(date)?, time, details)?;
            success(format!(
                "Schedule #{} added: {} on {} at {}",
                s.id, s.bus_name, s.date, s.time
            ));
        }

        ScheduleAction::List { bus, date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let list = ScheduleLogic::list(&pool, bus.as_deref(), date)?;
            if list.is_empty() {
                info("No schedules found.");
                return Ok(());
            }

            header("Bus schedules");
            let mut table = Table::with_headers(&["ID", "Bus", "Date", "Time", "Info"]);
            for s in &list {
                table.add_row(vec![
                    s.id.to_string(),
                    s.bus_name.clone(),
                    s.date.to_string(),
                    s.time.clone(),
                    s.info.clone(),
                ]);
            }
            print!("{}", table.render());
        }

        ScheduleAction::Edit { id, time, info: details } => {
            if time.is_none() && details.is_none() {
                warning("Nothing to change: pass --time and/or --info.");
                return Ok(());
            }
            let (s, notified) =
                ScheduleLogic::edit(&pool, *id, time.as_deref(), details.as_deref(), Utc::now())?;
            success(format!(
                "Schedule #{} updated: {} at {}. {} parent(s) notified.",
                s.id, s.bus_name, s.time, notified
            ));
        }
    }

    Ok(())
}
