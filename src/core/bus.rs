use crate::db::buses::{
    delete_bus, find_bus_by_name, find_schedule, insert_bus, insert_schedule, load_buses,
    load_schedules, update_bus, update_schedule,
};
use crate::db::log::ttlog_soft;
use crate::db::notifications::insert_notification;
use crate::db::pool::DbPool;
use crate::db::students::load_students_on_bus;
use crate::db::ts_to_db;
use crate::errors::{AppError, AppResult};
use crate::models::bus::{Bus, BusSchedule};
use crate::models::notification::NotificationRecord;
use crate::models::student::Student;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;
use tracing::debug;

fn required(value: &str, field: &'static str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::MissingField(field));
    }
    Ok(v.to_string())
}

/// Normalizes `H:MM` / `HH:MM` to `HH:MM`.
pub fn normalize_time(s: &str) -> AppResult<String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// Message stored for a parent whose child rides a bus whose schedule changed.
pub fn schedule_notification(
    student: &Student,
    schedule: &BusSchedule,
    now: &DateTime<Utc>,
) -> NotificationRecord {
    NotificationRecord {
        id: 0,
        student_id: student.id_number.clone(),
        student_name: student.name.clone(),
        parent_name: student.parent_name.clone(),
        parent_email: student.parent_email.clone(),
        parent_contact: student.parent_contact.clone(),
        message: format!(
            "Bus schedule updated: Time - {}, Info - {}. Please note the change.",
            schedule.time, schedule.info
        ),
        kind: "schedule".to_string(),
        direction: None,
        location: schedule.bus_name.clone(),
        status: "sent".to_string(),
        read: false,
        created_at: ts_to_db(now),
    }
}

pub struct BusLogic;

impl BusLogic {
    pub fn add(
        pool: &DbPool,
        name: &str,
        driver_name: &str,
        driver_contact: &str,
    ) -> AppResult<Bus> {
        let mut bus = Bus {
            id: 0,
            name: required(name, "bus name")?,
            driver_name: required(driver_name, "driver name")?,
            driver_contact: required(driver_contact, "driver contact")?,
            created_at: ts_to_db(&Utc::now()),
        };
        bus.id = insert_bus(&pool.conn, &bus)?;

        ttlog_soft(
            &pool.conn,
            "bus_add",
            &bus.name,
            &format!("Driver {} ({})", bus.driver_name, bus.driver_contact),
        );
        Ok(bus)
    }

    pub fn get(pool: &DbPool, name: &str) -> AppResult<Bus> {
        find_bus_by_name(&pool.conn, name.trim())?
            .ok_or_else(|| AppError::BusNotFound(name.trim().to_string()))
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<Bus>> {
        load_buses(&pool.conn)
    }

    /// `None` keeps the stored value.
    pub fn edit(
        pool: &DbPool,
        name: &str,
        new_name: Option<&str>,
        driver_name: Option<&str>,
        driver_contact: Option<&str>,
    ) -> AppResult<Bus> {
        let mut bus = Self::get(pool, name)?;

        if let Some(v) = new_name {
            let v = required(v, "bus name")?;
            if v != bus.name && find_bus_by_name(&pool.conn, &v)?.is_some() {
                return Err(AppError::DuplicateBus(v));
            }
            bus.name = v;
        }
        if let Some(v) = driver_name {
            bus.driver_name = required(v, "driver name")?;
        }
        if let Some(v) = driver_contact {
            bus.driver_contact = required(v, "driver contact")?;
        }

        update_bus(&pool.conn, &bus)?;
        ttlog_soft(&pool.conn, "bus_edit", &bus.name, "Bus updated");
        Ok(bus)
    }

    pub fn delete(pool: &DbPool, name: &str) -> AppResult<()> {
        let bus = Self::get(pool, name)?;
        delete_bus(&pool.conn, bus.id)?;
        ttlog_soft(&pool.conn, "bus_del", &bus.name, "Bus and schedules removed");
        Ok(())
    }
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    pub fn add(
        pool: &DbPool,
        bus_name: &str,
        date: NaiveDate,
        time: &str,
        info: &str,
    ) -> AppResult<BusSchedule> {
        let bus = BusLogic::get(pool, bus_name)?;
        let mut schedule = BusSchedule {
            id: 0,
            bus_id: bus.id,
            bus_name: bus.name,
            date,
            time: normalize_time(time)?,
            info: info.trim().to_string(),
            updated_at: ts_to_db(&Utc::now()),
        };
        schedule.id = insert_schedule(&pool.conn, &schedule)?;

        ttlog_soft(
            &pool.conn,
            "schedule_add",
            &schedule.bus_name,
            &format!("{} {}", schedule.date, schedule.time),
        );
        Ok(schedule)
    }

    pub fn list(
        pool: &DbPool,
        bus_name: Option<&str>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<BusSchedule>> {
        let bus_id = match bus_name {
            Some(name) => Some(BusLogic::get(pool, name)?.id),
            None => None,
        };
        load_schedules(&pool.conn, bus_id, date)
    }

    /// Updates time and/or info, then appends one `schedule` notification per
    /// parent of the students riding the bus. Returns the updated schedule and
    /// the number of notifications written.
    pub fn edit(
        pool: &DbPool,
        id: i64,
        time: Option<&str>,
        info: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<(BusSchedule, usize)> {
        let mut schedule =
            find_schedule(&pool.conn, id)?.ok_or(AppError::ScheduleNotFound(id))?;

        if let Some(t) = time {
            schedule.time = normalize_time(t)?;
        }
        if let Some(i) = info {
            schedule.info = i.trim().to_string();
        }
        schedule.updated_at = ts_to_db(&now);

        let riders = load_students_on_bus(&pool.conn, schedule.bus_id)?;

        let tx = pool.conn.unchecked_transaction()?;
        update_schedule(&tx, &schedule)?;

        let mut seen = HashSet::new();
        for student in &riders {
            let key = (student.parent_email.clone(), student.parent_contact.clone());
            if !seen.insert(key) {
                continue;
            }
            insert_notification(&tx, &schedule_notification(student, &schedule, &now))?;
        }
        tx.commit()?;

        debug!(schedule = id, parents = seen.len(), "schedule change notified");
        ttlog_soft(
            &pool.conn,
            "schedule_edit",
            &schedule.bus_name,
            &format!("{} {} ({} parent(s) notified)", schedule.date, schedule.time, seen.len()),
        );
        Ok((schedule, seen.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::student::{StudentForm, StudentLogic};
    use crate::db::initialize::init_db;
    use crate::db::notifications::load_all;
    use chrono::TimeZone;

    fn pool() -> DbPool {
        let pool = DbPool::open_in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        BusLogic::add(&pool, "Line 7", "Gino Neri", "+39 320 555000").unwrap();
        BusLogic::add(&pool, "Line 9", "Pia Conti", "+39 320 555999").unwrap();
        pool
    }

    fn enroll(pool: &DbPool, id: &str, email: &str, bus: &str) {
        StudentLogic::add(
            pool,
            StudentForm {
                id_number: id.into(),
                name: format!("Student {id}"),
                class: "1A".into(),
                parent_name: "Parent".into(),
                parent_contact: "+39 333 000111".into(),
                parent_email: Some(email.into()),
                parent_address: "Via Roma 1".into(),
                photo: None,
                bus: Some(bus.into()),
            },
        )
        .unwrap();
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
    }

    #[test]
    fn time_is_normalized() {
        assert_eq!(normalize_time("7:05").unwrap(), "07:05");
        assert!(matches!(normalize_time("25:00"), Err(AppError::InvalidTime(_))));
    }

    #[test]
    fn duplicate_bus_name_is_refused() {
        let pool = pool();
        assert!(matches!(
            BusLogic::add(&pool, "Line 7", "X", "Y"),
            Err(AppError::DuplicateBus(_))
        ));
        assert!(matches!(
            BusLogic::edit(&pool, "Line 9", Some("Line 7"), None, None),
            Err(AppError::DuplicateBus(_))
        ));
    }

    #[test]
    fn schedule_edit_notifies_each_parent_once() {
        let pool = pool();
        // siblings share a parent
        enroll(&pool, "STD001", "a@example.org", "Line 7");
        enroll(&pool, "STD002", "a@example.org", "Line 7");
        enroll(&pool, "STD003", "b@example.org", "Line 7");
        enroll(&pool, "STD004", "c@example.org", "Line 9");

        let s = ScheduleLogic::add(&pool, "Line 7", date(), "7:30", "Gate B").unwrap();
        assert!(load_all(&pool.conn).unwrap().is_empty());

        let now = Utc.with_ymd_and_hms(2025, 10, 19, 18, 0, 0).unwrap();
        let (updated, sent) =
            ScheduleLogic::edit(&pool, s.id, Some("07:45"), None, now).unwrap();

        assert_eq!(sent, 2);
        assert_eq!(updated.time, "07:45");
        assert_eq!(updated.info, "Gate B");

        let all = load_all(&pool.conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|n| n.kind == "schedule" && n.direction.is_none()));
        assert!(all.iter().all(|n| n.location == "Line 7"));
        assert!(all.iter().all(|n| n.created_at == "2025-10-19T18:00:00.000Z"));
        assert!(!all.iter().any(|n| n.parent_email == "c@example.org"));
        assert!(all[0].message.contains("Time - 07:45, Info - Gate B"));
    }

    #[test]
    fn edit_unknown_schedule_is_not_found() {
        let pool = pool();
        assert!(matches!(
            ScheduleLogic::edit(&pool, 42, None, Some("x"), Utc::now()),
            Err(AppError::ScheduleNotFound(42))
        ));
    }

    #[test]
    fn deleting_a_bus_unlinks_riders_and_drops_schedules() {
        let pool = pool();
        enroll(&pool, "STD001", "a@example.org", "Line 7");
        ScheduleLogic::add(&pool, "Line 7", date(), "07:30", "").unwrap();

        BusLogic::delete(&pool, "Line 7").unwrap();

        assert_eq!(StudentLogic::get(&pool, "STD001").unwrap().bus_id, None);
        assert!(ScheduleLogic::list(&pool, None, None).unwrap().is_empty());
        assert!(matches!(
            BusLogic::get(&pool, "Line 7"),
            Err(AppError::BusNotFound(_))
        ));
    }
}
