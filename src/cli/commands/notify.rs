use crate::cli::commands::open_pool;
use crate::cli::parser::NotifyAction;
use crate::config::Config;
use crate::core::notify::{NotifyLogic, Recipient};
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{CYAN, RESET, colorize_in_out};
use crate::utils::table::Table;
use chrono::Local;

pub fn handle(action: &NotifyAction, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    match action {
        NotifyAction::List {
            parent,
            student,
            all,
            unread,
        } => {
            let (who, label) = match (parent, student) {
                (Some(email), _) => (Recipient::Parent(email), email.as_str()),
                (None, Some(id)) => (Recipient::Student(id), id.as_str()),
                (None, None) if *all => (Recipient::Everyone, "everyone"),
                (None, None) => return Ok(()),
            };

            let list = NotifyLogic::list(&pool, who, *unread)?;
            if list.is_empty() {
                info(format!("No notifications for {}.", label));
                return Ok(());
            }

            header(format!("Notifications for {}", label));

            let mut table =
                Table::with_headers(&["ID", "Created", "Student", "Dir", "Message", ""]);
            for n in &list {
                let created = chrono::DateTime::parse_from_rfc3339(&n.created_at)
                    .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|_| n.created_at.clone());
                table.add_row(vec![
                    n.id.to_string(),
                    created,
                    n.student_id.clone(),
                    n.direction
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    n.message.clone(),
                    if n.read { String::new() } else { "new".to_string() },
                ]);
            }

            print!(
                "{}",
                table.render_with(|row, col, cell| match col {
                    3 => colorize_in_out(cell, list[row].direction.is_some_and(|d| d.is_in())),
                    5 => format!("{CYAN}{cell}{RESET}"),
                    _ => cell.to_string(),
                })
            );
        }

        NotifyAction::Read { id, all } => match (id, all) {
            (Some(id), _) => {
                NotifyLogic::mark_read(&pool, *id)?;
                success(format!("Notification #{} marked as read.", id));
            }
            (None, Some(email)) => {
                let n = NotifyLogic::mark_all_read(&pool, email)?;
                success(format!("{} notification(s) of {} marked as read.", n, email));
            }
            (None, None) => {}
        },
    }

    Ok(())
}
