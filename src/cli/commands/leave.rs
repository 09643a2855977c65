use crate::cli::commands::open_pool;
use crate::cli::parser::LeaveAction;
use crate::config::Config;
use crate::core::leave::LeaveLogic;
use crate::errors::AppResult;
use crate::models::leave::{LeaveApplication, LeaveStatus};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{RESET, color_for_leave_status};
use crate::utils::date::parse_date;
use crate::utils::table::Table;

fn print_leaves(list: &[LeaveApplication]) {
    let mut table = Table::with_headers(&[
        "ID", "Roll", "Name", "Class", "From", "To", "Status", "Reason",
    ]);
    for l in list {
        table.add_row(vec![
            l.id.to_string(),
            l.roll.clone(),
            l.student_name.clone(),
            l.student_class.clone(),
            l.from_date.to_string(),
            l.to_date.to_string(),
            l.status.to_string(),
            l.reason.clone(),
        ]);
    }

    print!(
        "{}",
        table.render_with(|row, col, cell| match col {
            6 => format!(
                "{}{}{}",
                color_for_leave_status(list[row].status.to_db_str()),
                cell,
                RESET
            ),
            _ => cell.to_string(),
        })
    );
}

pub fn handle(action: &LeaveAction, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    match action {
        LeaveAction::Add {
            name,
            class,
            roll,
            reason,
            from,
            to,
        } => {
            let from = parse_date(from)?;
            let to = parse_date(to)?;
            let l = LeaveLogic::submit(&pool, name, class, roll, reason, from, to)?;
            success(format!(
                "Leave #{} submitted for {} ({} ➝ {}), status {}",
                l.id, l.student_name, l.from_date, l.to_date, l.status
            ));
        }

        LeaveAction::List { pending } => {
            let list = LeaveLogic::list(&pool, *pending)?;
            if list.is_empty() {
                info("No leave applications found.");
            } else {
                header("Leave applications");
                print_leaves(&list);
            }
        }

        LeaveAction::Approve { id } => {
            let l = LeaveLogic::decide(&pool, *id, LeaveStatus::Approved)?;
            success(format!("Leave #{} for {} approved.", l.id, l.student_name));
        }

        LeaveAction::Reject { id } => {
            let l = LeaveLogic::decide(&pool, *id, LeaveStatus::Disapproved)?;
            success(format!("Leave #{} for {} disapproved.", l.id, l.student_name));
        }

        LeaveAction::Status { roll } => match LeaveLogic::status(&pool, roll)? {
            Some(l) => {
                println!(
                    "Leave #{} ({} ➝ {}): {}{}{}",
                    l.id,
                    l.from_date,
                    l.to_date,
                    color_for_leave_status(l.status.to_db_str()),
                    l.status,
                    RESET
                );
            }
            None => info(format!("No leave application for roll {}.", roll)),
        },
    }

    Ok(())
}
