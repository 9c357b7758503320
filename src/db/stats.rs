use ansi_term::Colour::{Cyan, Green, Yellow};
use rusqlite::Connection;
use std::fs;

/// Lookup totals per language, sorted by language code.
pub fn lookups_by_language(conn: &Connection) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT language, COUNT(*) FROM lookups
         GROUP BY language
         ORDER BY language ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

pub fn print_db_info(conn: &Connection, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{} {}", Cyan.paint("• File:"), Yellow.paint(db_path));
    println!("{} {:.1} KB", Cyan.paint("• Size:"), file_kb);

    let total: i64 = conn.query_row("SELECT COUNT(*) FROM lookups", [], |row| row.get(0))?;
    println!(
        "{} {}",
        Cyan.paint("• Total lookups:"),
        Green.paint(total.to_string())
    );

    let range: (Option<i64>, Option<i64>) = conn.query_row(
        "SELECT MIN(timestamp), MAX(timestamp) FROM lookups",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    if let (Some(first), Some(last)) = range {
        let fmt = |ts: i64| crate::utils::format_local_timestamp(ts).unwrap_or_else(|_| ts.to_string());
        println!("{}", Cyan.paint("• Time range:"));
        println!("    from: {}", fmt(first));
        println!("    to:   {}", fmt(last));
    }

    for (lang, n) in lookups_by_language(conn)? {
        println!("    {lang:<8} {n}");
    }

    println!();
    Ok(())
}
