pub mod attendance;
pub mod buses;
pub mod initialize;
pub mod leaves;
pub mod log;
pub mod migrate;
pub mod notifications;
pub mod pool;
pub mod stats;
pub mod store;
pub mod students;

use crate::errors::AppError;
use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as RFC 3339 UTC text with millisecond precision.
pub(crate) fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn ts_from_db(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(AppError::InvalidDate(s.to_string())))
}

/// Wrap a domain parsing error into the rusqlite row-mapping error.
pub(crate) fn conversion_error(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}
