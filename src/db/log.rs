use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Operations recorded in the internal `log` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOp {
    Init,
    Import,
    Config,
}

impl LogOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOp::Init => "init",
            LogOp::Import => "import",
            LogOp::Config => "config",
        }
    }
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, op: LogOp, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![now, op.as_str(), target, message])?;

    Ok(())
}
