//! Unified application error type.
//! All modules (lua, koreader, core, db, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{what} not found under {}", root.display())]
    NotFound { what: String, root: PathBuf },

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Decode error at offset {pos}: {msg}")]
    Decode { pos: usize, msg: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error(
        "No valid KOReader partition path found. Pass --reader or run `kovocab config --set-reader <PATH>`"
    )]
    NoReaderPartition,

    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
