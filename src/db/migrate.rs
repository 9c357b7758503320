use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `lookups` table. A lookup is identified by
/// (timestamp, word, language, source); re-imports never duplicate rows.
fn create_lookups_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS lookups (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp  INTEGER NOT NULL,
            word       TEXT NOT NULL,
            language   TEXT NOT NULL,
            source     TEXT NOT NULL DEFAULT 'koreader',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(timestamp, word, language, source)
        );

        CREATE INDEX IF NOT EXISTS idx_lookups_language ON lookups(language);
        "#,
    )?;
    Ok(())
}

/// Public entry point: create missing tables and run pending migrations.
///
/// Invoked by db::initialize::init_db(). Schema changes after the first
/// release go here, guarded so that each runs once.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "lookups")? {
        create_lookups_table(conn)?;
    }

    Ok(())
}
