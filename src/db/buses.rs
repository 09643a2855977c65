use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::bus::{Bus, BusSchedule};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql, params};

pub fn map_bus(row: &Row) -> Result<Bus> {
    Ok(Bus {
        id: row.get("id")?,
        name: row.get("name")?,
        driver_name: row.get("driver_name")?,
        driver_contact: row.get("driver_contact")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_bus(conn: &Connection, b: &Bus) -> AppResult<i64> {
    if find_bus_by_name(conn, &b.name)?.is_some() {
        return Err(AppError::DuplicateBus(b.name.clone()));
    }
    conn.execute(
        "INSERT INTO buses (name, driver_name, driver_contact, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![b.name, b.driver_name, b.driver_contact, b.created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_bus_by_name(conn: &Connection, name: &str) -> AppResult<Option<Bus>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM buses WHERE name = ?1")?;
    Ok(stmt.query_row([name], map_bus).optional()?)
}

pub fn find_bus(conn: &Connection, id: i64) -> AppResult<Option<Bus>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM buses WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_bus).optional()?)
}

pub fn load_buses(conn: &Connection) -> AppResult<Vec<Bus>> {
    let mut stmt = conn.prepare("SELECT * FROM buses ORDER BY name ASC")?;
    let mut out = Vec::new();
    for r in stmt.query_map([], map_bus)? {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_bus(conn: &Connection, b: &Bus) -> AppResult<()> {
    conn.execute(
        "UPDATE buses SET name = ?1, driver_name = ?2, driver_contact = ?3 WHERE id = ?4",
        params![b.name, b.driver_name, b.driver_contact, b.id],
    )?;
    Ok(())
}

/// Removes the bus and its schedules; students riding it are unlinked.
pub fn delete_bus(conn: &Connection, id: i64) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("UPDATE students SET bus_id = NULL WHERE bus_id = ?1", [id])?;
    tx.execute("DELETE FROM bus_schedules WHERE bus_id = ?1", [id])?;
    tx.execute("DELETE FROM buses WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(())
}

const SCHEDULE_SELECT: &str = "SELECT s.id, s.bus_id, b.name AS bus_name, s.date, s.time, \
                               s.info, s.updated_at
                               FROM bus_schedules s JOIN buses b ON b.id = s.bus_id";

pub fn map_schedule(row: &Row) -> Result<BusSchedule> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;

    Ok(BusSchedule {
        id: row.get("id")?,
        bus_id: row.get("bus_id")?,
        bus_name: row.get("bus_name")?,
        date,
        time: row.get("time")?,
        info: row.get("info")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn insert_schedule(conn: &Connection, s: &BusSchedule) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO bus_schedules (bus_id, date, time, info, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            s.bus_id,
            s.date.format("%Y-%m-%d").to_string(),
            s.time,
            s.info,
            s.updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_schedule(conn: &Connection, id: i64) -> AppResult<Option<BusSchedule>> {
    let sql = format!("{SCHEDULE_SELECT} WHERE s.id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_schedule).optional()?)
}

/// Schedules matching the optional bus / date filters, by date and time.
pub fn load_schedules(
    conn: &Connection,
    bus_id: Option<i64>,
    date: Option<NaiveDate>,
) -> AppResult<Vec<BusSchedule>> {
    let mut sql = format!("{SCHEDULE_SELECT} WHERE 1 = 1");
    let mut args: Vec<&dyn ToSql> = Vec::new();

    let date_str = date.map(|d| d.format("%Y-%m-%d").to_string());

    if let Some(id) = &bus_id {
        sql.push_str(" AND s.bus_id = ?");
        args.push(id);
    }
    if let Some(d) = &date_str {
        sql.push_str(" AND s.date = ?");
        args.push(d);
    }
    sql.push_str(" ORDER BY s.date ASC, s.time ASC, b.name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    for r in stmt.query_map(rusqlite::params_from_iter(args), map_schedule)? {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_schedule(conn: &Connection, s: &BusSchedule) -> AppResult<()> {
    conn.execute(
        "UPDATE bus_schedules SET time = ?1, info = ?2, updated_at = ?3 WHERE id = ?4",
        params![s.time, s.info, s.updated_at, s.id],
    )?;
    Ok(())
}
