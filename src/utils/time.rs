//! Time utilities: unix timestamps → local display strings.

use crate::errors::{AppError, AppResult};
use chrono::{Local, TimeZone};

/// Local wall-clock time with second precision, `YYYY-MM-DD HH:MM:SS`.
pub fn format_local_timestamp(ts: i64) -> AppResult<String> {
    let dt = Local
        .timestamp_opt(ts, 0)
        .single()
        .ok_or(AppError::InvalidTimestamp(ts))?;

    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
