use crate::errors::{AppError, AppResult};
use crate::models::student::Student;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str = "id, id_number, name, class, parent_name, parent_contact, \
                       parent_email, parent_address, photo, qr_value, bus_id, created_at";

pub fn map_row(row: &Row) -> Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        id_number: row.get("id_number")?,
        name: row.get("name")?,
        class: row.get("class")?,
        parent_name: row.get("parent_name")?,
        parent_contact: row.get("parent_contact")?,
        parent_email: row.get("parent_email")?,
        parent_address: row.get("parent_address")?,
        photo: row.get("photo")?,
        qr_value: row.get("qr_value")?,
        bus_id: row.get("bus_id")?,
        created_at: row.get("created_at")?,
    })
}

/// Insert a new student. The custom ID must be unique.
pub fn insert_student(conn: &Connection, s: &Student) -> AppResult<i64> {
    if find_student(conn, &s.id_number)?.is_some() {
        return Err(AppError::DuplicateStudent(s.id_number.clone()));
    }

    conn.execute(
        "INSERT INTO students (id_number, name, class, parent_name, parent_contact,
                               parent_email, parent_address, photo, qr_value, bus_id,
                               created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            s.id_number,
            s.name,
            s.class,
            s.parent_name,
            s.parent_contact,
            s.parent_email,
            s.parent_address,
            s.photo,
            s.qr_value,
            s.bus_id,
            s.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_student(conn: &Connection, id_number: &str) -> AppResult<Option<Student>> {
    let sql = format!("SELECT {COLUMNS} FROM students WHERE id_number = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id_number], map_row).optional()?)
}

/// All students sorted by name, optionally restricted to one class.
pub fn load_students(conn: &Connection, class: Option<&str>) -> AppResult<Vec<Student>> {
    let mut out = Vec::new();

    if let Some(c) = class {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE class = ?1 ORDER BY name ASC");
        let mut stmt = conn.prepare(&sql)?;
        for r in stmt.query_map([c], map_row)? {
            out.push(r?);
        }
    } else {
        let sql = format!("SELECT {COLUMNS} FROM students ORDER BY name ASC");
        let mut stmt = conn.prepare(&sql)?;
        for r in stmt.query_map([], map_row)? {
            out.push(r?);
        }
    }

    Ok(out)
}

/// Update every profile field of an existing student (matched by `id`).
pub fn update_student(conn: &Connection, s: &Student) -> AppResult<()> {
    conn.execute(
        "UPDATE students
         SET name = ?1, class = ?2, parent_name = ?3, parent_contact = ?4,
             parent_email = ?5, parent_address = ?6, photo = ?7, qr_value = ?8,
             bus_id = ?9
         WHERE id = ?10",
        params![
            s.name,
            s.class,
            s.parent_name,
            s.parent_contact,
            s.parent_email,
            s.parent_address,
            s.photo,
            s.qr_value,
            s.bus_id,
            s.id,
        ],
    )?;
    Ok(())
}

/// Remove a student profile. Attendance history is left untouched.
pub fn delete_student(conn: &Connection, id_number: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM students WHERE id_number = ?1", [id_number])?;
    Ok(n > 0)
}

/// Students riding a bus, sorted by name.
pub fn load_students_on_bus(conn: &Connection, bus_id: i64) -> AppResult<Vec<Student>> {
    let sql = format!("SELECT {COLUMNS} FROM students WHERE bus_id = ?1 ORDER BY name ASC");
    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    for r in stmt.query_map([bus_id], map_row)? {
        out.push(r?);
    }
    Ok(out)
}
