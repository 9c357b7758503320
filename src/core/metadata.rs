//! Per-book metadata (`Book.sdr/metadata.<ext>.lua`).

use crate::errors::{AppError, AppResult};
use crate::lua::Decoder;
use crate::models::book::BookRef;
use crate::utils::path::base_name;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// `/dir/Book.epub` → `/dir/Book.sdr/metadata.epub.lua`
pub fn metadata_path(book: &Path) -> PathBuf {
    let ext = book
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    book.with_file_name(format!("{}.sdr", base_name(book)))
        .join(format!("metadata{ext}.lua"))
}

/// Metadata files start with a comment line and `return {`. Drop the first
/// line, then everything up to the first space.
pub fn strip_header(raw: &str) -> String {
    let body = raw.lines().skip(1).collect::<Vec<_>>().join("\n");
    body.split(' ').skip(1).collect::<Vec<_>>().join(" ")
}

/// `(language, title)` from `doc_props`, if both are strings.
pub fn doc_props(decoder: &dyn Decoder, raw: &str) -> AppResult<(String, String)> {
    let data = decoder.decode(&strip_header(raw))?;

    let lang = data.path("doc_props.language").and_then(|v| v.as_str());
    let title = data.path("doc_props.title").and_then(|v| v.as_str());

    match (lang, title) {
        (Some(l), Some(t)) => Ok((l.to_string(), t.to_string())),
        _ => Err(AppError::Other(
            "metadata has no doc_props.language/doc_props.title".into(),
        )),
    }
}

/// Language and title of a book. Falls back to `default_language` and the
/// file's base name when the metadata cannot be read or lacks the fields.
pub fn read_book(decoder: &dyn Decoder, book: &Path, default_language: &str) -> BookRef {
    let meta = metadata_path(book);
    let parsed = fs::read_to_string(&meta)
        .map_err(AppError::from)
        .and_then(|raw| doc_props(decoder, &raw));

    match parsed {
        Ok((language, title)) => BookRef {
            path: book.to_path_buf(),
            language,
            title,
        },
        Err(e) => {
            debug!("Metadata fallback for {}: {e}", meta.display());
            BookRef {
                path: book.to_path_buf(),
                language: default_language.to_string(),
                title: base_name(book),
            }
        }
    }
}
