use crate::cli::commands::open_pool;
use crate::cli::parser::StudentAction;
use crate::config::Config;
use crate::core::student::{StudentForm, StudentLogic, StudentPatch};
use crate::db::buses::find_bus;
use crate::errors::AppResult;
use crate::models::bus::Bus;
use crate::models::student::Student;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;

fn print_profile(s: &Student, bus: Option<&Bus>) {
    header(format!("{} ({})", s.name, s.id_number));
    println!("Class          : {}", s.class);
    println!("Parent         : {}", s.parent_name);
    println!("Parent contact : {}", s.parent_contact);
    println!(
        "Parent email   : {}",
        colorize_optional(if s.parent_email.is_empty() { "-" } else { &s.parent_email })
    );
    println!("Parent address : {}", s.parent_address);
    if let Some(photo) = &s.photo {
        println!("Photo          : {}", photo);
    }
    match bus {
        Some(b) => println!("Bus            : {} (driver {}, {})", b.name, b.driver_name, b.driver_contact),
        None => println!("Bus            : {}", colorize_optional("-")),
    }
    let qr = s.qr_value.as_deref().unwrap_or("-");
    let opts = textwrap::Options::new(72).subsequent_indent("                 ");
    println!("QR payload     : {}", textwrap::fill(qr, opts));
}

pub fn handle(action: &StudentAction, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;

    match action {
        StudentAction::Add {
            id,
            name,
            class,
            parent_name,
            parent_contact,
            parent_email,
            parent_address,
            photo,
            bus,
        } => {
            let s = StudentLogic::add(
                &pool,
                StudentForm {
                    id_number: id.clone(),
                    name: name.clone(),
                    class: class.clone(),
                    parent_name: parent_name.clone(),
                    parent_contact: parent_contact.clone(),
                    parent_email: parent_email.clone(),
                    parent_address: parent_address.clone(),
                    photo: photo.clone(),
                    bus: bus.clone(),
                },
            )?;
            success(format!("Student {} ({}) registered.", s.name, s.id_number));
            if let Some(qr) = &s.qr_value {
                info(format!("QR payload: {}", qr));
            }
        }

        StudentAction::List { class } => {
            let list = StudentLogic::list(&pool, class.as_deref())?;
            if list.is_empty() {
                info("No students found.");
                return Ok(());
            }

            header("Students");
            let mut table = Table::with_headers(&["ID", "Name", "Class", "Parent", "Contact"]);
            for s in &list {
                table.add_row(vec![
                    s.id_number.clone(),
                    s.name.clone(),
                    s.class.clone(),
                    s.parent_name.clone(),
                    s.parent_reference().to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        StudentAction::Show { id } => {
            let s = StudentLogic::get(&pool, id)?;
            let bus = match s.bus_id {
                Some(id) => find_bus(&pool.conn, id)?,
                None => None,
            };
            print_profile(&s, bus.as_ref());
        }

        StudentAction::Edit {
            id,
            name,
            class,
            parent_name,
            parent_contact,
            parent_email,
            parent_address,
            photo,
            bus,
        } => {
            let patch = StudentPatch {
                name: name.clone(),
                class: class.clone(),
                parent_name: parent_name.clone(),
                parent_contact: parent_contact.clone(),
                parent_email: parent_email.clone(),
                parent_address: parent_address.clone(),
                photo: photo.clone(),
                bus: bus.clone(),
            };
            let s = StudentLogic::edit(&pool, id, patch)?;
            success(format!("Student {} updated.", s.id_number));
        }

        StudentAction::Del { id } => {
            StudentLogic::delete(&pool, id)?;
            success(format!("Student {} deleted.", id.trim()));
        }
    }

    Ok(())
}
