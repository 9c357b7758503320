//! KOReader on-disk conventions: where books, the vocabulary builder
//! database and the lookup history live on a device partition.

use crate::core::metadata::metadata_path;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::vocab::VocabEntry;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const VOCAB_DB_NAME: &str = "vocabulary_builder.sqlite3";
pub const HISTORY_NAME: &str = "lookup_history.lua";

/// Extensions KOReader opens and keeps `.sdr` metadata for.
pub const BOOK_EXTENSIONS: &[&str] = &[
    "epub", "fb2", "mobi", "azw", "azw3", "pdf", "djvu", "cbz", "txt", "html", "htm", "docx",
    "rtf", "chm",
];

fn is_book(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| BOOK_EXTENSIONS.contains(&e.as_str()))
}

fn is_sdr_dir(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "sdr")
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

/// Directory entries sorted by path, so scans are deterministic.
fn sorted_entries(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());
    Ok(entries)
}

/// Every book under `root` that has KOReader metadata next to it, in path
/// order. Hidden and `.sdr` directories are not descended into.
pub fn scan_books(root: &Path) -> AppResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AppError::NotFound {
            what: "Partition directory".into(),
            root: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    walk_books(root, &mut found)?;
    debug!("Found {} books under {}", found.len(), root.display());
    Ok(found)
}

fn walk_books(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in sorted_entries(dir)? {
        let path = entry.path();
        let ft = entry.file_type()?;

        if ft.is_dir() {
            if is_sdr_dir(&path) || is_hidden(&path) {
                continue;
            }
            // unreadable subfolders (system dirs on the device) are skipped
            if let Err(e) = walk_books(&path, found) {
                debug!("Skipping {}: {e}", path.display());
            }
        } else if ft.is_file() && is_book(&path) && metadata_path(&path).is_file() {
            found.push(path);
        }
    }
    Ok(())
}

/// First file called `name` under `root`, depth-first in path order.
/// Hidden directories are searched (KOReader itself lives in `.adds/` on
/// Kobo devices); `.sdr` directories are not.
fn find_file(root: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    for entry in sorted_entries(root)? {
        let path = entry.path();
        let ft = entry.file_type()?;

        if ft.is_file() && entry.file_name() == name {
            return Ok(Some(path));
        }
        if ft.is_dir() && !is_sdr_dir(&path) {
            match find_file(&path, name) {
                Ok(Some(p)) => return Ok(Some(p)),
                Ok(None) => {}
                Err(e) => debug!("Skipping {}: {e}", path.display()),
            }
        }
    }
    Ok(None)
}

fn find_required(root: &Path, name: &str) -> AppResult<PathBuf> {
    find_file(root, name)?.ok_or_else(|| AppError::NotFound {
        what: name.to_string(),
        root: root.to_path_buf(),
    })
}

pub fn find_db_path(root: &Path) -> AppResult<PathBuf> {
    find_required(root, VOCAB_DB_NAME)
}

pub fn find_history_path(root: &Path) -> AppResult<PathBuf> {
    find_required(root, HISTORY_NAME)
}

/// Vocabulary builder database, opened read-only.
pub struct VocabDb {
    pool: DbPool,
}

impl VocabDb {
    pub fn open(path: &Path) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::open_readonly(path)?,
        })
    }

    /// `title(id, name)`; rows with a NULL name are dropped.
    pub fn titles(&self) -> AppResult<Vec<(i64, String)>> {
        let mut stmt = self.pool.conn.prepare("SELECT id, name FROM title")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut out = Vec::new();
        for r in rows {
            if let (id, Some(name)) = r? {
                out.push((id, name));
            }
        }
        Ok(out)
    }

    /// `vocabulary` rows in table order. Rows that do not map (NULL word,
    /// non-numeric time) are skipped.
    pub fn entries(&self) -> AppResult<Vec<VocabEntry>> {
        let mut stmt = self.pool.conn.prepare(
            "SELECT create_time, word, title_id, prev_context, next_context FROM vocabulary",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(VocabEntry {
                // REAL in some builds; fractions are not kept
                create_time: row.get::<_, f64>(0)? as i64,
                word: row.get(1)?,
                title_id: row.get(2)?,
                prev_context: row.get(3)?,
                next_context: row.get(4)?,
            })
        })?;

        Ok(rows
            .filter_map(|r| match r {
                Ok(e) => Some(e),
                Err(e) => {
                    debug!("Skipping vocabulary row: {e}");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(p: &Path) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "").unwrap();
    }

    #[test]
    fn scan_keeps_books_with_metadata_in_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        touch(&root.join("b/Zeta.epub"));
        touch(&root.join("b/Zeta.sdr/metadata.epub.lua"));
        touch(&root.join("a/Alpha.fb2"));
        touch(&root.join("a/Alpha.sdr/metadata.fb2.lua"));
        touch(&root.join("a/NoMeta.epub"));
        touch(&root.join("a/notes.md"));
        touch(&root.join(".hidden/Secret.epub"));
        touch(&root.join(".hidden/Secret.sdr/metadata.epub.lua"));

        let books = scan_books(root).unwrap();
        assert_eq!(books, vec![root.join("a/Alpha.fb2"), root.join("b/Zeta.epub")]);
    }

    #[test]
    fn scan_of_missing_root_fails() {
        assert!(matches!(
            scan_books(Path::new("/no/such/partition/kovocab")),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn finds_settings_in_hidden_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let db = root.join(".adds/koreader/settings").join(VOCAB_DB_NAME);
        touch(&db);

        assert_eq!(find_db_path(root).unwrap(), db);
        assert!(matches!(
            find_history_path(root),
            Err(AppError::NotFound { .. })
        ));
    }
}
