use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::{DailyEntry, summarize};
use crate::db::attendance::load_records;
use crate::errors::AppResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::direction::Direction;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::date::parse_date;
use crate::utils::table::Table;
use chrono::{DateTime, Local, Utc};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        student,
        date,
        scanner,
        direction,
        summary,
    } = cmd
    {
        let day = date.as_deref().map(parse_date).transpose()?;
        let direction = direction.as_deref().map(Direction::parse).transpose()?;

        let pool = open_pool(cfg)?;
        let mut records = load_records(&pool.conn, student.as_deref(), *scanner)?;

        if let Some(d) = day {
            records.retain(|r| r.local_time().date_naive() == d);
        }
        if let Some(dir) = direction {
            records.retain(|r| r.direction == dir);
        }

        if records.is_empty() {
            info("No attendance records found.");
            return Ok(());
        }

        if *summary {
            print_summary(&summarize(&records));
        } else {
            print_records(&records);
        }
    }

    Ok(())
}

fn print_records(records: &[AttendanceRecord]) {
    header("Attendance records");

    let mut table = Table::with_headers(&[
        "ID", "Date", "Time", "Student", "Name", "Dir", "Location", "Scanner", "Recorded by",
    ]);
    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            r.date_str(),
            r.time_str(),
            r.student_id.clone(),
            r.student_name.clone(),
            r.direction.to_string(),
            r.location.clone(),
            r.scanner.to_string(),
            r.recorded_by.clone(),
        ]);
    }

    print!(
        "{}",
        table.render_with(|row, col, cell| match col {
            5 => colorize_in_out(cell, records[row].direction.is_in()),
            _ => cell.to_string(),
        })
    );
}

fn hms(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_summary(days: &[DailyEntry]) {
    header("Daily summary");

    let mut table = Table::with_headers(&["Date", "Student", "Name", "IN", "OUT", "Status"]);
    for d in days {
        table.add_row(vec![
            d.date.to_string(),
            d.student_id.clone(),
            d.student_name.clone(),
            hms(d.in_at),
            hms(d.out_at),
            d.status().to_string(),
        ]);
    }

    print!(
        "{}",
        table.render_with(|_, col, cell| match col {
            3 => colorize_in_out(cell, true),
            4 => colorize_in_out(cell, false),
            _ => colorize_optional(cell),
        })
    );
}
