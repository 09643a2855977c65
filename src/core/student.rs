use crate::db::buses::find_bus_by_name;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::students::{
    delete_student, find_student, insert_student, load_students, update_student,
};
use crate::errors::{AppError, AppResult};
use crate::models::student::Student;
use chrono::Local;

/// Profile fields supplied by staff when registering a student.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub id_number: String,
    pub name: String,
    pub class: String,
    pub parent_name: String,
    pub parent_contact: String,
    pub parent_email: Option<String>,
    pub parent_address: String,
    pub photo: Option<String>,
    /// Bus name; the bus must already be registered.
    pub bus: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub class: Option<String>,
    pub parent_name: Option<String>,
    pub parent_contact: Option<String>,
    pub parent_email: Option<String>,
    pub parent_address: Option<String>,
    pub photo: Option<String>,
    /// Bus name, or an empty string to unlink the student.
    pub bus: Option<String>,
}

fn required(value: &str, field: &'static str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::MissingField(field));
    }
    Ok(v.to_string())
}

fn bus_id_for(pool: &DbPool, name: &str) -> AppResult<Option<i64>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    find_bus_by_name(&pool.conn, name)?
        .map(|b| Some(b.id))
        .ok_or_else(|| AppError::BusNotFound(name.to_string()))
}

/// Regenerate the card payload from the current profile.
fn refresh_qr(student: &mut Student) -> AppResult<()> {
    student.qr_value = Some(student.qr_payload().to_json()?);
    Ok(())
}

pub struct StudentLogic;

impl StudentLogic {
    pub fn add(pool: &DbPool, form: StudentForm) -> AppResult<Student> {
        let mut student = Student {
            id: 0,
            id_number: required(&form.id_number, "id")?,
            name: required(&form.name, "name")?,
            class: required(&form.class, "class")?,
            parent_name: required(&form.parent_name, "parent name")?,
            parent_contact: required(&form.parent_contact, "parent contact")?,
            parent_email: form.parent_email.unwrap_or_default().trim().to_string(),
            parent_address: required(&form.parent_address, "parent address")?,
            photo: form.photo.filter(|p| !p.trim().is_empty()),
            qr_value: None,
            bus_id: match form.bus.as_deref() {
                Some(name) => bus_id_for(pool, name)?,
                None => None,
            },
            created_at: Local::now().to_rfc3339(),
        };
        refresh_qr(&mut student)?;

        student.id = insert_student(&pool.conn, &student)?;

        ttlog_soft(
            &pool.conn,
            "student_add",
            &student.id_number,
            &format!("Registered {} ({})", student.name, student.class),
        );
        Ok(student)
    }

    pub fn get(pool: &DbPool, id_number: &str) -> AppResult<Student> {
        find_student(&pool.conn, id_number.trim())?
            .ok_or_else(|| AppError::StudentNotFound(id_number.trim().to_string()))
    }

    pub fn list(pool: &DbPool, class: Option<&str>) -> AppResult<Vec<Student>> {
        load_students(&pool.conn, class)
    }

    pub fn edit(pool: &DbPool, id_number: &str, patch: StudentPatch) -> AppResult<Student> {
        let mut student = Self::get(pool, id_number)?;

        if let Some(v) = patch.name {
            student.name = required(&v, "name")?;
        }
        if let Some(v) = patch.class {
            student.class = required(&v, "class")?;
        }
        if let Some(v) = patch.parent_name {
            student.parent_name = required(&v, "parent name")?;
        }
        if let Some(v) = patch.parent_contact {
            student.parent_contact = required(&v, "parent contact")?;
        }
        if let Some(v) = patch.parent_email {
            student.parent_email = v.trim().to_string();
        }
        if let Some(v) = patch.parent_address {
            student.parent_address = required(&v, "parent address")?;
        }
        if let Some(v) = patch.photo {
            student.photo = Some(v).filter(|p| !p.trim().is_empty());
        }
        if let Some(v) = patch.bus {
            student.bus_id = bus_id_for(pool, &v)?;
        }

        refresh_qr(&mut student)?;
        update_student(&pool.conn, &student)?;

        ttlog_soft(&pool.conn, "student_edit", &student.id_number, "Profile updated");
        Ok(student)
    }

    /// Attendance and notifications of the student are kept.
    pub fn delete(pool: &DbPool, id_number: &str) -> AppResult<()> {
        let id = id_number.trim();
        if !delete_student(&pool.conn, id)? {
            return Err(AppError::StudentNotFound(id.to_string()));
        }
        ttlog_soft(&pool.conn, "student_del", id, "Profile removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::models::qr::QrPayload;

    fn pool() -> DbPool {
        let pool = DbPool::open_in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn form(id: &str) -> StudentForm {
        StudentForm {
            id_number: id.into(),
            name: "Luca Bianchi".into(),
            class: "2B".into(),
            parent_name: "Sara Bianchi".into(),
            parent_contact: "+39 347 1234567".into(),
            parent_email: Some("sara@example.org".into()),
            parent_address: "Via Verdi 4".into(),
            photo: None,
            bus: None,
        }
    }

    #[test]
    fn add_stores_card_payload() {
        let pool = pool();
        let s = StudentLogic::add(&pool, form("STD010")).unwrap();

        let qr: QrPayload = serde_json::from_str(s.qr_value.as_deref().unwrap()).unwrap();
        assert_eq!(qr.id_number, "STD010");
        assert_eq!(qr.student_name, "Luca Bianchi");
        assert_eq!(StudentLogic::get(&pool, "STD010").unwrap(), s);
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let pool = pool();
        StudentLogic::add(&pool, form("STD010")).unwrap();
        assert!(matches!(
            StudentLogic::add(&pool, form("STD010")),
            Err(AppError::DuplicateStudent(_))
        ));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let pool = pool();
        let mut f = form("STD011");
        f.parent_contact = "  ".into();
        assert!(matches!(
            StudentLogic::add(&pool, f),
            Err(AppError::MissingField("parent contact"))
        ));
    }

    #[test]
    fn edit_regenerates_payload() {
        let pool = pool();
        StudentLogic::add(&pool, form("STD012")).unwrap();

        let patch = StudentPatch {
            name: Some("Luca B. Bianchi".into()),
            ..Default::default()
        };
        let s = StudentLogic::edit(&pool, "STD012", patch).unwrap();

        assert_eq!(s.class, "2B");
        assert!(s.qr_value.unwrap().contains("Luca B. Bianchi"));
    }

    #[test]
    fn bus_link_requires_a_registered_bus() {
        let pool = pool();
        let mut f = form("STD013");
        f.bus = Some("Line 7".into());
        assert!(matches!(
            StudentLogic::add(&pool, f),
            Err(AppError::BusNotFound(_))
        ));

        let bus = crate::core::bus::BusLogic::add(&pool, "Line 7", "Gino Neri", "+39 320 555000")
            .unwrap();
        let mut f = form("STD013");
        f.bus = Some("Line 7".into());
        assert_eq!(StudentLogic::add(&pool, f).unwrap().bus_id, Some(bus.id));

        let patch = StudentPatch {
            bus: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(StudentLogic::edit(&pool, "STD013", patch).unwrap().bus_id, None);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let pool = pool();
        assert!(matches!(
            StudentLogic::delete(&pool, "NOPE"),
            Err(AppError::StudentNotFound(_))
        ));
    }
}
