// src/export/logic.rs

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::models::reading_note::ReadingNote;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export of reading notes.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `notes` to `file`. An empty note list writes nothing.
    pub fn export(
        notes: &[ReadingNote],
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if notes.is_empty() {
            warning("No reading notes to export.");
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(notes, path),
            ExportFormat::Json => export_json(notes, path),
        }
    }
}
