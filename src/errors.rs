//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    /// The event store could not be reached (busy, locked, cannot open).
    /// Nothing was written; the caller may simply scan again.
    #[error("Store temporarily unavailable, please scan again: {0}")]
    StoreUnavailable(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid scanner type: {0}")]
    InvalidScanner(String),

    #[error("Invalid QR payload: {0}")]
    InvalidQrPayload(String),

    #[error("Empty input: please enter a student ID")]
    EmptyInput,

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Student not found with ID: {0}")]
    StudentNotFound(String),

    #[error("A student with ID {0} already exists")]
    DuplicateStudent(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Notification not found: {0}")]
    NotificationNotFound(i64),

    #[error("Leave application not found: {0}")]
    LeaveNotFound(i64),

    #[error("Leave application {id} is already {status}")]
    LeaveAlreadyDecided { id: i64, status: String },

    #[error("Invalid leave status: {0}")]
    InvalidLeaveStatus(String),

    #[error("Invalid leave range: {0}")]
    InvalidLeaveRange(String),

    #[error("Bus not found: {0}")]
    BusNotFound(String),

    #[error("A bus named {0} already exists")]
    DuplicateBus(String),

    #[error("Bus schedule not found: {0}")]
    ScheduleNotFound(i64),

    #[error("Invalid time format (expected HH:MM): {0}")]
    InvalidTime(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
                if matches!(
                    err.code,
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen
                ) =>
            {
                AppError::StoreUnavailable(e.to_string())
            }
            _ => AppError::Db(e),
        }
    }
}

impl AppError {
    /// True when repeating the same action later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
