use crate::db::log::LogOp;
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

const MAX_OP_WIDTH: usize = 40;

fn color_for_operation(op: &str) -> Colour {
    match op {
        o if o == LogOp::Import.as_str() => Colour::Green,
        o if o == LogOp::Init.as_str() => Colour::RGB(255, 153, 51),
        o if o == LogOp::Config.as_str() => Colour::Yellow,
        _ => Colour::White,
    }
}

/// `op (target)` cut to `max` visible characters.
fn op_label(operation: &str, target: &str, max: usize) -> String {
    let full = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    if full.chars().count() > max {
        let mut s: String = full.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        full
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok((
                row.get::<_, i64>(0)?,
                date,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                row.get::<_, String>(4)?,
            ))
        })?;

        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            let label = op_label(&operation, &target, MAX_OP_WIDTH);
            // pad on the visible text, colour only the operation word
            let padding = " ".repeat(MAX_OP_WIDTH.saturating_sub(label.chars().count()));
            let colored = match label.split_once(' ') {
                Some((op, rest)) => format!("{} {rest}", color_for_operation(&operation).paint(op)),
                None => color_for_operation(&operation).paint(label.as_str()).to_string(),
            };

            println!("{id:>id_w$}: {date} | {colored}{padding} => {message}");
        }

        Ok(())
    }
}
