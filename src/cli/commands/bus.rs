use crate::cli::commands::open_pool;
use crate::cli::parser::BusAction;
use crate::config::Config;
use crate::core::bus::BusLogic;
use crate::db::students::load_students_on_bus;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;

pub fn handle(action: &BusAction, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    match action {
        BusAction::Add {
            name,
            driver_name,
            driver_contact,
        } => {
            let b = BusLogic::add(&pool, name, driver_name, driver_contact)?;
            success(format!("Bus {} registered (driver {}).", b.name, b.driver_name));
        }

        BusAction::List => {
            let list = BusLogic::list(&pool)?;
            if list.is_empty() {
                info("No buses registered.");
                return Ok(());
            }

            header("Buses");
            let mut table = Table::with_headers(&["Bus", "Driver", "Contact", "Students"]);
            for b in &list {
                let riders = load_students_on_bus(&pool.conn, b.id)?.len();
                table.add_row(vec![
                    b.name.clone(),
                    b.driver_name.clone(),
                    b.driver_contact.clone(),
                    riders.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        BusAction::Edit {
            name,
            new_name,
            driver_name,
            driver_contact,
        } => {
            let b = BusLogic::edit(
                &pool,
                name,
                new_name.as_deref(),
                driver_name.as_deref(),
                driver_contact.as_deref(),
            )?;
            success(format!("Bus {} updated.", b.name));
        }

        BusAction::Del { name } => {
            BusLogic::delete(&pool, name)?;
            success(format!("Bus {} deleted.", name.trim()));
        }
    }

    Ok(())
}
