use crate::db::leaves::{find_leave, insert_leave, latest_by_roll, load_leaves, set_status};
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::leave::{LeaveApplication, LeaveStatus};
use crate::db::ts_to_db;
use chrono::{NaiveDate, Utc};

pub struct LeaveLogic;

impl LeaveLogic {
    /// Submit an application; it starts as `Pending`.
    pub fn submit(
        pool: &DbPool,
        student_name: &str,
        student_class: &str,
        roll: &str,
        reason: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<LeaveApplication> {
        for (value, field) in [
            (student_name, "student name"),
            (student_class, "class"),
            (roll, "roll"),
            (reason, "reason"),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::MissingField(field));
            }
        }

        if to < from {
            return Err(AppError::InvalidLeaveRange(format!("{} ➝ {}", from, to)));
        }

        let mut leave = LeaveApplication {
            id: 0,
            student_name: student_name.trim().to_string(),
            student_class: student_class.trim().to_string(),
            roll: roll.trim().to_string(),
            reason: reason.trim().to_string(),
            from_date: from,
            to_date: to,
            status: LeaveStatus::Pending,
            created_at: ts_to_db(&Utc::now()),
        };
        leave.id = insert_leave(&pool.conn, &leave)?;

        ttlog_soft(
            &pool.conn,
            "leave_add",
            &leave.roll,
            &format!("Leave requested {} ➝ {}", from, to),
        );
        Ok(leave)
    }

    pub fn list(pool: &DbPool, pending_only: bool) -> AppResult<Vec<LeaveApplication>> {
        load_leaves(&pool.conn, pending_only)
    }

    /// Approve or disapprove a pending application.
    pub fn decide(pool: &DbPool, id: i64, status: LeaveStatus) -> AppResult<LeaveApplication> {
        let mut leave = find_leave(&pool.conn, id)?.ok_or(AppError::LeaveNotFound(id))?;

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::LeaveAlreadyDecided {
                id,
                status: leave.status.to_string(),
            });
        }

        set_status(&pool.conn, id, status)?;
        leave.status = status;

        ttlog_soft(
            &pool.conn,
            "leave_decide",
            &leave.roll,
            &format!("Leave #{} {}", id, status),
        );
        Ok(leave)
    }

    /// Latest application for a roll number, if any.
    pub fn status(pool: &DbPool, roll: &str) -> AppResult<Option<LeaveApplication>> {
        latest_by_roll(&pool.conn, roll.trim())
    }
}
