//! Lookup record store.
//!
//! The importer only sees [`LookupRecorder`]. Calls happen in a fixed order:
//! every `record_lookup(.., commit = false)` of a run, then a single
//! `commit()`. Nothing is persisted until that commit.

use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::lookup::LookupRecord;
use rusqlite::{Connection, params};

pub trait LookupRecorder {
    /// Store one lookup at `timestamp` (unix seconds). Duplicates are
    /// ignored by the store. With `commit = false` the write stays pending
    /// until [`LookupRecorder::commit`].
    fn record_lookup(&mut self, record: &LookupRecord, timestamp: i64, commit: bool)
    -> AppResult<()>;

    /// Committed and pending lookups for a language.
    fn count_lookups(&self, language: &str) -> AppResult<i64>;

    fn commit(&mut self) -> AppResult<()>;
}

pub struct SqliteRecorder {
    pool: DbPool,
    in_tx: bool,
}

impl SqliteRecorder {
    /// Open (or create) the store and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool, in_tx: false })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }
}

impl LookupRecorder for SqliteRecorder {
    fn record_lookup(
        &mut self,
        record: &LookupRecord,
        timestamp: i64,
        commit: bool,
    ) -> AppResult<()> {
        if !self.in_tx {
            self.pool.conn.execute_batch("BEGIN")?;
            self.in_tx = true;
        }

        self.pool
            .conn
            .prepare_cached(
                "INSERT OR IGNORE INTO lookups (timestamp, word, language, source)
                 VALUES (?1, ?2, ?3, ?4)",
            )?
            .execute(params![timestamp, record.word, record.language, record.source])?;

        if commit {
            self.commit()?;
        }
        Ok(())
    }

    fn count_lookups(&self, language: &str) -> AppResult<i64> {
        let n = self.pool.conn.query_row(
            "SELECT COUNT(*) FROM lookups WHERE language = ?1",
            [language],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    fn commit(&mut self) -> AppResult<()> {
        if self.in_tx {
            self.pool.conn.execute_batch("COMMIT")?;
            self.in_tx = false;
        }
        Ok(())
    }
}
